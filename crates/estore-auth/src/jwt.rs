//! Signing and validation of bearer tokens.
//!
//! [`TokenIssuer`] owns the HS256 key pair derived from the configured secret
//! and a [`Clock`]. Two kinds of token are minted:
//!
//! - **Access tokens** (default lifetime one hour) authorize API calls.
//! - **Refresh tokens** (default lifetime seven days) can only be exchanged
//!   for a new access token.
//!
//! jsonwebtoken's built-in `exp` check is switched off; expiry is decided
//! against the injected clock so that issuing and validating always agree on
//! what "now" is.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use estore_auth::{SystemClock, TokenIssuer};
//! use estore_config::JwtConfig;
//!
//! let issuer = TokenIssuer::new(&JwtConfig::from_env()?, Arc::new(SystemClock));
//! let pair = issuer.issue_token_pair(user_id, role)?;
//! let claims = issuer.validate_access_token(&pair.access_token)?;
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use estore_config::JwtConfig;
use estore_core::{AuthError, Role};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::claims::{Claims, RefreshTokenClaims, TokenClaims, TokenUse};
use crate::clock::Clock;

pub const TOKEN_TYPE: &str = "Bearer";

/// Tokens handed back to a client after login or refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    /// Present after login, absent after refresh.
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("expires_in", &self.expires_in)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_lifetime: Duration::seconds(config.access_token_expiry),
            refresh_lifetime: Duration::seconds(config.refresh_token_expiry),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    /// Mints an access token stamped with the clock's current time.
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<(String, Claims), AuthError> {
        let iat = self.clock.timestamp();
        let claims = Claims {
            sub: user_id,
            role,
            iat,
            exp: iat + self.access_lifetime.num_seconds(),
            token_use: TokenUse::Access,
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    pub fn issue_refresh_token(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<(String, RefreshTokenClaims), AuthError> {
        let iat = self.clock.timestamp();
        let claims = RefreshTokenClaims {
            sub: user_id,
            role,
            iat,
            exp: iat + self.refresh_lifetime.num_seconds(),
            jti: Uuid::new_v4(),
            token_use: TokenUse::Refresh,
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    /// Access token plus refresh token, as returned by login.
    pub fn issue_token_pair(&self, user_id: Uuid, role: Role) -> Result<TokenPair, AuthError> {
        let (access_token, claims) = self.issue_access_token(user_id, role)?;
        let (refresh_token, _) = self.issue_refresh_token(user_id, role)?;

        Ok(TokenPair {
            access_token,
            expires_in: claims.exp - claims.iat,
            refresh_token: Some(refresh_token),
        })
    }

    /// Exchanges a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated, so the returned pair carries
    /// no `refresh_token`.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let refresh_claims = self.validate_refresh_token(refresh_token)?;
        let (access_token, claims) =
            self.issue_access_token(refresh_claims.sub, refresh_claims.role)?;

        Ok(TokenPair {
            access_token,
            expires_in: claims.exp - claims.iat,
            refresh_token: None,
        })
    }

    /// Bad signature or shape is `TokenInvalid`; `now >= exp` is `TokenExpired`.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_claims(token, TokenUse::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, AuthError> {
        self.decode_claims(token, TokenUse::Refresh)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }

    fn decode_claims<T>(&self, token: &str, expected: TokenUse) -> Result<T, AuthError>
    where
        T: DeserializeOwned + TokenClaims,
    {
        let claims = decode::<T>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected at decode");
                AuthError::TokenInvalid
            })?
            .claims;

        if claims.token_use() != expected {
            debug!(?expected, actual = ?claims.token_use(), "Token presented to the wrong endpoint");
            return Err(AuthError::TokenInvalid);
        }

        if claims.is_expired_at(self.clock.timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const START: i64 = 1_700_000_000;

    fn issuer_with_clock() -> (TokenIssuer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let issuer = TokenIssuer::new(&JwtConfig::new("test-secret"), clock.clone());
        (issuer, clock)
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let (issuer, _) = issuer_with_clock();
        let user_id = Uuid::new_v4();

        let (token, issued) = issuer.issue_access_token(user_id, Role::Admin).unwrap();
        let claims = issuer.validate_access_token(&token).unwrap();

        assert_eq!(claims, issued);
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, START);
        assert_eq!(claims.exp, START + 3600);
    }

    #[test]
    fn test_access_token_valid_until_exp() {
        let (issuer, clock) = issuer_with_clock();
        let (token, _) = issuer
            .issue_access_token(Uuid::new_v4(), Role::RegularUser)
            .unwrap();

        clock.advance(Duration::minutes(59));
        assert!(issuer.validate_access_token(&token).is_ok());

        clock.advance(Duration::seconds(59));
        assert!(issuer.validate_access_token(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            issuer.validate_access_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_access_token_expired_after_61_minutes() {
        let (issuer, clock) = issuer_with_clock();
        let (token, _) = issuer
            .issue_access_token(Uuid::new_v4(), Role::RegularUser)
            .unwrap();

        clock.advance(Duration::minutes(61));
        assert!(matches!(
            issuer.validate_access_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let (issuer, _) = issuer_with_clock();
        for token in ["", "not.a.jwt", "abc", "a.b.c.d"] {
            assert!(matches!(
                issuer.validate_access_token(token),
                Err(AuthError::TokenInvalid)
            ));
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let (issuer, clock) = issuer_with_clock();
        let other = TokenIssuer::new(&JwtConfig::new("another-secret"), clock);
        let (token, _) = other
            .issue_access_token(Uuid::new_v4(), Role::Admin)
            .unwrap();

        assert!(matches!(
            issuer.validate_access_token(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let (issuer, _) = issuer_with_clock();
        let (token, _) = issuer
            .issue_access_token(Uuid::new_v4(), Role::RegularUser)
            .unwrap();
        let (admin_token, _) = issuer.issue_access_token(Uuid::new_v4(), Role::Admin).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(matches!(
            issuer.validate_access_token(&forged),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_unknown_claims_are_rejected() {
        #[derive(Serialize)]
        struct Padded {
            sub: Uuid,
            role: Role,
            iat: i64,
            exp: i64,
            token_use: TokenUse,
            scope: &'static str,
        }

        let (issuer, _) = issuer_with_clock();
        let token = issuer
            .sign(&Padded {
                sub: Uuid::new_v4(),
                role: Role::Admin,
                iat: START,
                exp: START + 60,
                token_use: TokenUse::Access,
                scope: "everything",
            })
            .unwrap();

        assert!(matches!(
            issuer.validate_access_token(&token),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let (issuer, _) = issuer_with_clock();
        let (refresh, _) = issuer
            .issue_refresh_token(Uuid::new_v4(), Role::RegularUser)
            .unwrap();

        assert!(matches!(
            issuer.validate_access_token(&refresh),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let (issuer, _) = issuer_with_clock();
        let (access, _) = issuer
            .issue_access_token(Uuid::new_v4(), Role::RegularUser)
            .unwrap();

        assert!(matches!(
            issuer.refresh(&access),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_token_pair() {
        let (issuer, _) = issuer_with_clock();
        let user_id = Uuid::new_v4();
        let pair = issuer.issue_token_pair(user_id, Role::RegularUser).unwrap();

        assert_eq!(pair.expires_in, 3600);
        let refresh = pair.refresh_token.expect("login returns a refresh token");
        let refresh_claims = issuer.validate_refresh_token(&refresh).unwrap();
        assert_eq!(refresh_claims.sub, user_id);
        assert_eq!(refresh_claims.exp, START + 604_800);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let (issuer, _) = issuer_with_clock();
        let user_id = Uuid::new_v4();
        let (first, _) = issuer.issue_refresh_token(user_id, Role::Admin).unwrap();
        let (second, _) = issuer.issue_refresh_token(user_id, Role::Admin).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_refresh_yields_later_expiry() {
        let (issuer, clock) = issuer_with_clock();
        let user_id = Uuid::new_v4();
        let pair = issuer.issue_token_pair(user_id, Role::Admin).unwrap();
        let original = issuer.validate_access_token(&pair.access_token).unwrap();

        clock.advance(Duration::minutes(10));
        let refreshed = issuer
            .refresh(pair.refresh_token.as_deref().unwrap())
            .unwrap();
        let claims = issuer.validate_access_token(&refreshed.access_token).unwrap();

        assert!(refreshed.refresh_token.is_none());
        assert!(claims.exp > original.exp);
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_refresh_with_expired_refresh_token() {
        let (issuer, clock) = issuer_with_clock();
        let pair = issuer
            .issue_token_pair(Uuid::new_v4(), Role::RegularUser)
            .unwrap();

        clock.advance(Duration::days(7));
        assert!(matches!(
            issuer.refresh(pair.refresh_token.as_deref().unwrap()),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_custom_lifetimes() {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let config = JwtConfig {
            secret: "s".to_string(),
            access_token_expiry: 60,
            refresh_token_expiry: 120,
        };
        let issuer = TokenIssuer::new(&config, clock);
        let pair = issuer.issue_token_pair(Uuid::new_v4(), Role::Admin).unwrap();
        assert_eq!(pair.expires_in, 60);
    }

    #[test]
    fn test_debug_hides_token_material() {
        let (issuer, _) = issuer_with_clock();
        let pair = issuer
            .issue_token_pair(Uuid::new_v4(), Role::RegularUser)
            .unwrap();
        let debug = format!("{pair:?} {issuer:?}");
        assert!(!debug.contains(&pair.access_token));
        assert!(!debug.contains("test-secret"));
    }
}
