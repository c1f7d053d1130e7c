#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use estore::router::init_router;
use estore::state::AppState;
use estore_auth::{ManualClock, TokenIssuer};
use estore_config::{CorsConfig, JwtConfig};
use estore_core::{PasswordHasher, Role};
use estore_db::{AccountStore, MemoryAccountStore};
use estore_models::users::User;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use estore::modules::auth::service::AuthService;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const START: i64 = 1_700_000_000;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryAccountStore>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryAccountStore::new()))
    }

    pub fn with_store(store: Arc<MemoryAccountStore>) -> Self {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let state = AppState::new(
            store.clone(),
            Arc::new(TokenIssuer::new(&JwtConfig::new(TEST_SECRET), clock.clone())),
            PasswordHasher::new(4).unwrap(),
            CorsConfig::default(),
        );

        Self {
            router: init_router(state.clone()),
            state,
            store,
            clock,
        }
    }

    /// Builds an app over an arbitrary store. The returned clock still
    /// drives token expiry.
    pub fn with_dyn_store(store: Arc<dyn AccountStore>) -> (Router, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let state = AppState::new(
            store,
            Arc::new(TokenIssuer::new(&JwtConfig::new(TEST_SECRET), clock.clone())),
            PasswordHasher::new(4).unwrap(),
            CorsConfig::default(),
        );
        (init_router(state), clock)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn create_user(&self, username: &str, password: &str, role: Role) -> User {
        AuthService::register_account(
            self.store.as_ref(),
            &self.state.hasher,
            username.to_string(),
            password.to_string(),
            role,
        )
        .await
        .unwrap()
    }

    /// Logs in and returns the parsed token response.
    pub async fn login(&self, username: &str, password: &str) -> Value {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                json!({ "username": username, "password": password }),
                None,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "login as {username}");
        body_json(response).await
    }

    pub async fn access_token(&self, username: &str, password: &str) -> String {
        self.login(username, password).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
