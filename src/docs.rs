use estore_core::{ErrorResponse, Role};
use estore_models::auth::{
    LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, TokenResponse,
};
use estore_models::users::{UpdatePasswordRequest, UpdateUsernameRequest, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_current_user,
        crate::modules::users::controller::update_current_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::update_password,
    ),
    components(
        schemas(
            User,
            Role,
            LoginRequest,
            RegisterRequest,
            RefreshTokenRequest,
            TokenResponse,
            MessageResponse,
            UpdateUsernameRequest,
            UpdatePasswordRequest,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh, logout, and registration"),
        (name = "Users", description = "Profile and user management")
    ),
    info(
        title = "estore API",
        version = "0.1.0",
        description = "Account and access-control service for the estore marketplace.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
