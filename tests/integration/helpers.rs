//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use estate_api::{AppState, build_app};
use estate_core::config::{AppConfig, StoreProvider};
use estate_database::{IdentityStore, MemoryIdentityStore, MemoryTokenLedger};
use estate_entity::user::User;

/// Test application context backed by the in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct handle on the identity store
    pub identities: MemoryIdentityStore,
    /// Direct handle on the token ledger
    pub ledger: MemoryTokenLedger,
    /// Application config
    pub config: AppConfig,
}

/// An access/refresh pair returned by register, authenticate, or refresh.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

impl Tokens {
    fn from_body(body: &Value) -> Self {
        Self {
            access: body["accessToken"]
                .as_str()
                .expect("No accessToken in response")
                .to_string(),
            refresh: body["refreshToken"]
                .as_str()
                .expect("No refreshToken in response")
                .to_string(),
        }
    }
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        config.auth.password_hash_memory_kib = 1024;
        config.auth.password_hash_iterations = 1;

        let ledger = MemoryTokenLedger::new();
        let identities = MemoryIdentityStore::with_ledger(ledger.clone());

        let state = AppState::new(
            config.clone(),
            Arc::new(identities.clone()),
            Arc::new(ledger.clone()),
            None,
        )
        .expect("Failed to build app state");
        let router = build_app(state, &config.server);

        Self {
            router,
            identities,
            ledger,
            config,
        }
    }

    /// Register an account and return its first token pair
    pub async fn register(&self, email: &str, password: &str, role: &str) -> Tokens {
        let response = self
            .request(
                "POST",
                "/api/v1/auth/register",
                Some(register_body(email, password, role)),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );
        Tokens::from_body(&response.body)
    }

    /// Authenticate and return the new token pair
    pub async fn login(&self, email: &str, password: &str) -> Tokens {
        let response = self.authenticate(email, password).await;
        assert_eq!(
            response.status,
            StatusCode::ACCEPTED,
            "Login failed: {:?}",
            response.body
        );
        Tokens::from_body(&response.body)
    }

    /// Raw authenticate call
    pub async fn authenticate(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/v1/auth/authenticate",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Look an account up directly in the identity store
    pub async fn user(&self, email: &str) -> User {
        self.identities
            .find_by_email(email)
            .await
            .expect("Identity store failed")
            .expect("User not found")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        self.send(req, body).await
    }

    /// Make a request with an arbitrary Authorization header value
    pub async fn request_with_header(&self, method: &str, path: &str, header: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Authorization", header);
        self.send(req, None).await
    }

    async fn send(&self, req: axum::http::request::Builder, body: Option<Value>) -> TestResponse {
        let req = match body {
            Some(body) => req
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&body).expect("Failed to serialize body"),
                )),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A registration body with fixed names and phone number
pub fn register_body(email: &str, password: &str, role: &str) -> Value {
    serde_json::json!({
        "firstName": "Test",
        "lastName": "User",
        "mobileNumber": "0123456789",
        "email": email,
        "password": password,
        "role": role,
    })
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
