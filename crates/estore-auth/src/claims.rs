use estore_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which endpoint family a token may be presented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Payload of an access token.
///
/// Decoding rejects any payload carrying fields not listed here, so a
/// refresh token can never pass as an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub token_use: TokenUse,
}

/// Payload of a refresh token. `jti` makes every refresh token unique even
/// when two are minted in the same second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshTokenClaims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
    pub token_use: TokenUse,
}

/// Fields every token payload shares, used by the generic decoder.
pub trait TokenClaims {
    fn expires_at(&self) -> i64;
    fn token_use(&self) -> TokenUse;

    /// Closed-open validity window: a token stops being valid at `exp`.
    fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at()
    }
}

impl TokenClaims for Claims {
    fn expires_at(&self) -> i64 {
        self.exp
    }

    fn token_use(&self) -> TokenUse {
        self.token_use
    }
}

impl TokenClaims for RefreshTokenClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }

    fn token_use(&self) -> TokenUse {
        self.token_use
    }
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> Claims {
        Claims {
            sub: Uuid::nil(),
            role: Role::Admin,
            iat: 100,
            exp: 200,
            token_use: TokenUse::Access,
        }
    }

    #[test]
    fn test_claims_serialized_shape() {
        let value = serde_json::to_value(claims()).unwrap();
        assert_eq!(
            value,
            json!({
                "sub": "00000000-0000-0000-0000-000000000000",
                "role": "admin",
                "iat": 100,
                "exp": 200,
                "token_use": "access",
            })
        );
    }

    #[test]
    fn test_claims_reject_unknown_fields() {
        let payload = json!({
            "sub": Uuid::nil(),
            "role": "admin",
            "iat": 100,
            "exp": 200,
            "token_use": "access",
            "is_superuser": true,
        });
        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }

    #[test]
    fn test_claims_reject_missing_fields() {
        let payload = json!({ "sub": Uuid::nil(), "exp": 200 });
        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }

    #[test]
    fn test_refresh_claims_do_not_decode_as_access_claims() {
        let refresh = RefreshTokenClaims {
            sub: Uuid::new_v4(),
            role: Role::RegularUser,
            iat: 100,
            exp: 200,
            jti: Uuid::new_v4(),
            token_use: TokenUse::Refresh,
        };
        let value = serde_json::to_value(&refresh).unwrap();
        assert!(serde_json::from_value::<Claims>(value).is_err());
    }

    #[test]
    fn test_expiry_window_is_closed_open() {
        let claims = claims();
        assert!(!claims.is_expired_at(199));
        assert!(claims.is_expired_at(200));
        assert!(claims.is_expired_at(201));
    }
}
