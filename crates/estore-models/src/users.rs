use chrono::{DateTime, Utc};
use estore_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validate_password_bytes;

/// An account identity. The credential lives in its own record and never
/// leaves the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUsernameRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,
}

/// The current password is always required, including when an admin
/// changes someone else's password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    #[validate(
        length(min = 1, message = "Current password is required"),
        custom(function = "validate_password_bytes")
    )]
    pub old_password: String,
    #[validate(
        length(min = 6, message = "New password must be at least 6 characters"),
        custom(function = "validate_password_bytes")
    )]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization() {
        let user = User {
            id: Uuid::nil(),
            username: "alice".to_string(),
            role: Role::RegularUser,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap(),
        };
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["username"], "alice");
        assert_eq!(value["role"], "regular_user");
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn test_update_password_validation() {
        let ok = UpdatePasswordRequest {
            old_password: "old".to_string(),
            new_password: "new-password".to_string(),
        };
        assert!(ok.validate().is_ok());

        let six = UpdatePasswordRequest {
            old_password: "old".to_string(),
            new_password: "abcdef".to_string(),
        };
        assert!(six.validate().is_ok());

        let short = UpdatePasswordRequest {
            old_password: "old".to_string(),
            new_password: "abcde".to_string(),
        };
        assert!(short.validate().is_err());

        let missing_old = UpdatePasswordRequest {
            old_password: String::new(),
            new_password: "new-password".to_string(),
        };
        assert!(missing_old.validate().is_err());
    }

    #[test]
    fn test_update_username_validation() {
        let req = UpdateUsernameRequest {
            username: String::new(),
        };
        assert!(req.validate().is_err());

        let req = UpdateUsernameRequest {
            username: "bo".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
