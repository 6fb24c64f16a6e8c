#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use category_service::config::{CategoryConfig, MongoConfig};
use category_service::models::{Category, CategoryChanges};
use category_service::services::{CategoryStore, InMemoryCategoryStore, MongoDb};
use category_service::startup::{router, AppState, Application};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tower::ServiceExt;

/// Router wired to a fresh in-memory store; no database needed.
pub struct TestRouter {
    pub router: Router,
    pub store: Arc<InMemoryCategoryStore>,
}

impl TestRouter {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryCategoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn CategoryStore>);
        Self {
            router: router(state),
            store,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }
}

/// Router over a store whose every call fails with a database error carrying `message`.
pub fn failing_router(message: &'static str) -> Router {
    router(AppState::new(Arc::new(FailingStore { message })))
}

/// Store double standing in for an unreachable MongoDB.
pub struct FailingStore {
    pub message: &'static str,
}

impl FailingStore {
    fn error(&self) -> AppError {
        AppError::DatabaseError(anyhow::anyhow!(self.message))
    }
}

#[async_trait]
impl CategoryStore for FailingStore {
    async fn insert(&self, _category: Category) -> Result<Category, AppError> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: &ObjectId) -> Result<Option<Category>, AppError> {
        Err(self.error())
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Category>, AppError> {
        Err(self.error())
    }

    async fn update(
        &self,
        _id: &ObjectId,
        _changes: CategoryChanges,
    ) -> Result<Option<Category>, AppError> {
        Err(self.error())
    }

    async fn delete(&self, _id: &ObjectId) -> Result<bool, AppError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(self.error())
    }
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, body)
}

/// Full application against a live MongoDB with a throwaway database.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("category_test_{}", uuid::Uuid::new_v4().simple());

        let config = CategoryConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                ..CoreConfig::default()
            },
            mongodb: MongoConfig {
                uri: std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
                database: db_name.clone(),
                server_selection_timeout_secs: 5,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
