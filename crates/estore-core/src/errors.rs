use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use tracing::error;
use utoipa::ToSchema;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failures of the authentication and authorization layer.
///
/// Variants carry internal detail only; the text a client sees is fixed by
/// the `From<AuthError> for AppError` mapping below.
#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token has expired")]
    TokenExpired,
    #[error("token is invalid")]
    TokenInvalid,
    #[error("access denied")]
    Forbidden,
    #[error("username already exists")]
    DuplicateUsername,
    #[error("password hashing failed: {0}")]
    HashingFailure(String),
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error("token signing failed: {0}")]
    SigningFailure(String),
    #[error("persistence failure")]
    PersistenceFailure(#[source] Error),
}

impl AuthError {
    pub fn persistence(err: impl Into<Error>) -> Self {
        Self::PersistenceFailure(err.into())
    }

    /// Failures that say nothing about the caller and everything about the server.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::HashingFailure(_)
                | Self::MalformedHash
                | Self::SigningFailure(_)
                | Self::PersistenceFailure(_)
        )
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new(status: StatusCode, error: impl Into<Error>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn internal(error: impl Into<Error>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow!(message))
    }

    pub fn bad_request(error: impl Into<Error>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unprocessable(error: impl Into<Error>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, error)
    }

    pub fn not_found(error: impl Into<Error>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn conflict(error: impl Into<Error>) -> Self {
        Self::new(StatusCode::CONFLICT, error)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message))
    }

    /// Message placed in the response body. Server errors never expose their cause.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserNotFound | AuthError::InvalidCredentials => {
                Self::unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            AuthError::TokenExpired => Self::unauthorized("Token has expired".to_string()),
            AuthError::TokenInvalid => Self::unauthorized("Invalid token".to_string()),
            AuthError::Forbidden => Self::forbidden("Access denied".to_string()),
            AuthError::DuplicateUsername => Self::conflict(anyhow!("Username already exists")),
            internal => Self::internal(internal),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        (self.status, body).into_response()
    }
}
