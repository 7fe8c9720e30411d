/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the full router in-process:
/// - Test database setup (migrations run on first use)
/// - Request helpers that go through the real middleware stack
/// - Registration/login helpers with unique usernames per test
///
/// These tests require a running PostgreSQL database and skip themselves
/// when DATABASE_URL is unset.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use tower::Service as _;
use uuid::Uuid;

/// Signing secret used by every test token
pub const TEST_JWT_SECRET: &str = "taskboard-test-secret-key-0123456789abcdef";

/// Sends a request through a router clone and parses the JSON response
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Test context holding the database pool and the built router
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context, or None when DATABASE_URL is unset
    pub async fn new() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping integration test");
            return None;
        };

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: url.clone(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let db = PgPool::connect(&url).await.expect("Failed to connect");

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("Migrations failed");

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Some(TestContext { db, app })
    }

    /// Generates a username no other test run can collide with
    pub fn unique_username(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }

    /// Sends a request through the router and parses the JSON response
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.app, method, uri, token, body).await
    }

    /// Registers a user, returning the raw response
    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Registers and logs in, returning the user id and bearer token
    pub async fn register_and_login(&self, username: &str, password: &str) -> (i64, String) {
        let (status, body) = self.register(username, password).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let user_id = body["id"].as_i64().expect("register returns id");

        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        let token = body["token"].as_str().expect("login returns token");

        (user_id, token.to_string())
    }

    /// Creates a task as the given caller, returning its id
    pub async fn create_task(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .request("POST", "/tasks", Some(token), Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);

        body["id"].as_i64().expect("create returns id")
    }
}
