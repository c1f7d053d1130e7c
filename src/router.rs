use axum::http::{HeaderValue, Method, header};
use axum::routing::{MethodRouter, get};
use axum::{Json, Router, middleware};
use estore_core::AccessTier;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::access::{TierGuard, enforce_access_tier};
use crate::modules::auth::router::init_auth_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// Router in which every route declares its [`AccessTier`] at registration.
///
/// Non-public routes get the tier guard as a route layer, so the decision
/// never depends on the request path. Registering two tiers on the same path
/// with different methods is fine; each method keeps its own guard.
pub struct TieredRouter {
    state: AppState,
    router: Router<AppState>,
}

impl TieredRouter {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            router: Router::new(),
        }
    }

    pub fn route(
        mut self,
        path: &str,
        tier: AccessTier,
        method_router: MethodRouter<AppState>,
    ) -> Self {
        let method_router = if tier.requires_identity() {
            method_router.route_layer(middleware::from_fn_with_state(
                TierGuard::new(self.state.clone(), tier),
                enforce_access_tier,
            ))
        } else {
            method_router
        };

        self.router = self.router.route(path, method_router);
        self
    }

    pub fn into_router(self) -> Router<AppState> {
        self.router
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let public = TieredRouter::new(state.clone())
        .route("/health", AccessTier::Public, get(health))
        .into_router();

    Router::new()
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(public)
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(state.clone()))
                .nest("/users", init_users_router(state.clone())),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
