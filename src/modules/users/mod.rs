//! Profile and user management.

pub mod controller;
pub mod router;
pub mod service;
