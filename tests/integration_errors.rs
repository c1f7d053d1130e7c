mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{TestApp, body_json, json_request};
use estore_db::{AccountCredentials, AccountStore, NewAccount, StoreError};
use estore_models::users::User;
use serde_json::json;
use uuid::Uuid;

/// A store whose backend is always unreachable.
#[derive(Debug)]
struct UnavailableStore;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AccountStore for UnavailableStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        unavailable()
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        unavailable()
    }

    async fn find_credentials(
        &self,
        _username: &str,
    ) -> Result<Option<AccountCredentials>, StoreError> {
        unavailable()
    }

    async fn find_password_hash(&self, _user_id: Uuid) -> Result<Option<String>, StoreError> {
        unavailable()
    }

    async fn create_account(&self, _account: NewAccount) -> Result<User, StoreError> {
        unavailable()
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        unavailable()
    }

    async fn update_username(
        &self,
        _id: Uuid,
        _username: &str,
    ) -> Result<Option<User>, StoreError> {
        unavailable()
    }

    async fn update_password_hash(
        &self,
        _user_id: Uuid,
        _password_hash: &str,
    ) -> Result<bool, StoreError> {
        unavailable()
    }

    async fn delete_account(&self, _id: Uuid) -> Result<bool, StoreError> {
        unavailable()
    }
}

#[tokio::test]
async fn test_storage_failure_hides_cause() {
    let (router, _clock) = TestApp::with_dyn_store(Arc::new(UnavailableStore));

    for (uri, body) in [
        (
            "/api/auth/login",
            json!({ "username": "alice", "password": "alice-password" }),
        ),
        (
            "/api/auth/register",
            json!({ "username": "alice", "password": "alice-password" }),
        ),
    ] {
        let response = tower::ServiceExt::oneshot(
            router.clone(),
            json_request("POST", uri, body, None),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("pool"));
    }
}
