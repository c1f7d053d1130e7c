//! Login, token refresh, logout, and self-registration.

pub mod controller;
pub mod router;
pub mod service;
