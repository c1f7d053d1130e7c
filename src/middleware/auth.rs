use axum::{extract::FromRequestParts, http::request::Parts};
use estore_auth::Claims;
use estore_core::{AppError, AuthError, Role};
use uuid::Uuid;

/// Identity bound to a request once its access token has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

impl From<&Claims> for CurrentUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// Extractor for the identity bound by the access-tier middleware.
///
/// Only usable on routes registered with a non-public tier; anywhere else it
/// rejects with 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CurrentUser);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role.is_admin()
    }

    /// True when the caller owns the resource or is an admin.
    pub fn is_owner_or_admin(&self, owner_id: Uuid) -> bool {
        self.0.id == owner_id || self.is_admin()
    }

    pub fn ensure_owner_or_admin(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.is_owner_or_admin(owner_id) {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(CurrentUser {
            id: Uuid::new_v4(),
            role,
        })
    }

    #[test]
    fn test_owner_is_allowed() {
        let user = auth_user(Role::RegularUser);
        assert!(user.is_owner_or_admin(user.user_id()));
        assert!(user.ensure_owner_or_admin(user.user_id()).is_ok());
    }

    #[test]
    fn test_other_regular_user_is_forbidden() {
        let user = auth_user(Role::RegularUser);
        let err = user.ensure_owner_or_admin(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "Access denied");
    }

    #[test]
    fn test_admin_may_act_on_anyone() {
        let admin = auth_user(Role::Admin);
        assert!(admin.is_admin());
        assert!(admin.is_owner_or_admin(Uuid::new_v4()));
    }

    #[test]
    fn test_current_user_from_claims() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Admin,
            iat: 0,
            exp: 60,
            token_use: estore_auth::TokenUse::Access,
        };
        let current = CurrentUser::from(&claims);
        assert_eq!(current.id, claims.sub);
        assert_eq!(current.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_extractor_reads_bound_identity() {
        let current = CurrentUser {
            id: Uuid::new_v4(),
            role: Role::RegularUser,
        };
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(current);

        let AuthUser(extracted) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, current);
    }

    #[tokio::test]
    async fn test_extractor_without_identity_is_401() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
