use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Role carried by every account and embedded in its tokens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    RegularUser,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::RegularUser => "regular_user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular_user" => Ok(Role::RegularUser),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Access level attached to a route when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTier {
    /// No identity required.
    Public,
    /// Any valid access token.
    AuthenticatedUser,
    /// Valid access token whose role is exactly [`Role::Admin`].
    Admin,
}

impl AccessTier {
    pub fn requires_identity(&self) -> bool {
        !matches!(self, AccessTier::Public)
    }

    pub fn admits(&self, role: Role) -> bool {
        match self {
            AccessTier::Public | AccessTier::AuthenticatedUser => true,
            AccessTier::Admin => role == Role::Admin,
        }
    }
}
