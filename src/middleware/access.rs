use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use estore_core::{AccessTier, AppError, AuthError};
use tracing::{debug, warn};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// State handed to [`enforce_access_tier`]: the application state plus the
/// tier the guarded route was registered with.
#[derive(Clone, Debug)]
pub struct TierGuard {
    pub state: AppState,
    pub tier: AccessTier,
}

impl TierGuard {
    pub fn new(state: AppState, tier: AccessTier) -> Self {
        Self { state, tier }
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format".to_string()))
}

/// Validates the caller's access token and checks it against the route tier.
///
/// On success the caller's [`CurrentUser`] is inserted into the request
/// extensions. Missing, malformed, invalid, or expired tokens yield 401; a
/// valid token whose role the tier does not admit yields 403.
pub async fn enforce_access_tier(
    State(guard): State<TierGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !guard.tier.requires_identity() {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers())?;
    let claims = guard.state.tokens.validate_access_token(token)?;
    let current_user = CurrentUser::from(&claims);

    if !guard.tier.admits(current_user.role) {
        warn!(
            user.id = %current_user.id,
            user.role = %current_user.role,
            tier = ?guard.tier,
            path = %req.uri().path(),
            "Access denied by route tier"
        );
        return Err(AuthError::Forbidden.into());
    }

    debug!(user.id = %current_user.id, tier = ?guard.tier, "Request authorized");
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}
