use estore_auth::TokenIssuer;
use estore_core::{AuthError, PasswordHasher, Role};
use estore_db::{AccountStore, NewAccount, StoreError};
use estore_models::auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse};
use estore_models::users::User;
use tracing::{error, info, instrument, warn};

use crate::metrics;

pub struct AuthService;

/// Runs bcrypt on the blocking pool.
pub async fn hash_password(hasher: &PasswordHasher, password: String) -> Result<String, AuthError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::HashingFailure(e.to_string()))?
}

pub async fn verify_password(
    hasher: &PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, AuthError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| AuthError::HashingFailure(e.to_string()))?
}

async fn burn_dummy_verification(hasher: &PasswordHasher, password: String) {
    let hasher = hasher.clone();
    let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
}

impl AuthService {
    /// Self-registration. Always creates a regular user.
    #[instrument(skip(store, hasher, dto), fields(user.username = %dto.username))]
    pub async fn register_user(
        store: &dyn AccountStore,
        hasher: &PasswordHasher,
        dto: RegisterRequest,
    ) -> Result<User, AuthError> {
        Self::register_account(store, hasher, dto.username, dto.password, Role::RegularUser).await
    }

    /// Creates an identity and its credential as one unit.
    ///
    /// A username that is already taken, whether seen up front or lost in a
    /// race with a concurrent registration, fails with `DuplicateUsername`
    /// and leaves no records behind.
    #[instrument(skip(store, hasher, password), fields(user.role = %role))]
    pub async fn register_account(
        store: &dyn AccountStore,
        hasher: &PasswordHasher,
        username: String,
        password: String,
        role: Role,
    ) -> Result<User, AuthError> {
        if store.find_by_username(&username).await?.is_some() {
            warn!(user.username = %username, "Registration rejected: username taken");
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = hash_password(hasher, password).await?;

        let user = store
            .create_account(NewAccount {
                username,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation => {
                    warn!("Registration lost a race for the same username");
                    AuthError::DuplicateUsername
                }
                other => {
                    error!(error = %other, "Failed to persist new account");
                    AuthError::from(other)
                }
            })?;

        metrics::track_user_registered(user.role);
        info!(user.id = %user.id, user.role = %user.role, "Account registered");
        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// Unknown users still pay for one bcrypt verification so that timing
    /// does not reveal whether an account exists.
    #[instrument(skip(store, hasher, password))]
    pub async fn authenticate(
        store: &dyn AccountStore,
        hasher: &PasswordHasher,
        username: &str,
        password: String,
    ) -> Result<User, AuthError> {
        let Some(credentials) = store.find_credentials(username).await? else {
            burn_dummy_verification(hasher, password).await;
            return Err(AuthError::UserNotFound);
        };

        if !verify_password(hasher, password, credentials.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    #[instrument(skip(store, hasher, tokens, dto), fields(user.username = %dto.username))]
    pub async fn login_user(
        store: &dyn AccountStore,
        hasher: &PasswordHasher,
        tokens: &TokenIssuer,
        dto: LoginRequest,
    ) -> Result<TokenResponse, AuthError> {
        let user = match Self::authenticate(store, hasher, &dto.username, dto.password).await {
            Ok(user) => user,
            Err(err) => {
                let reason = match err {
                    AuthError::UserNotFound => "user_not_found",
                    AuthError::InvalidCredentials => "invalid_password",
                    _ => "error",
                };
                metrics::track_user_login_failure(reason);
                warn!(reason, "Login failed");
                return Err(err);
            }
        };

        let pair = tokens.issue_token_pair(user.id, user.role)?;
        metrics::track_user_login_success(user.role);
        metrics::track_token_issued("access");
        metrics::track_token_issued("refresh");
        info!(user.id = %user.id, "User logged in");

        Ok(TokenResponse::from(pair))
    }

    /// New access token for a valid refresh token. The refresh token is not
    /// rotated.
    #[instrument(skip(tokens, dto))]
    pub fn refresh_token(
        tokens: &TokenIssuer,
        dto: RefreshTokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let pair = tokens.refresh(&dto.refresh_token).inspect_err(|err| {
            warn!(error = %err, "Refresh rejected");
        })?;
        metrics::track_token_issued("access");
        Ok(TokenResponse::from(pair))
    }
}
