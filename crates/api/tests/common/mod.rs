//! Common test utilities for integration tests.
//!
//! These helpers run the router against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. When the variable is unset, `TestContext::new` returns
//! `None` and the calling test returns early.

// Not every integration test uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use contacts_api::{
    app::{create_app, AppState},
    config::{
        Config, CookieConfig, DatabaseConfig, FeaturesConfig, JwtAuthConfig, LoggingConfig,
        SecurityConfig, ServerConfig,
    },
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "SecureP@ss123";

/// Test configuration with an HS256 secret and the access cookie enabled.
pub fn test_config(database_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            app_base_url: "http://localhost:8080".to_string(),
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
        },
        jwt: JwtAuthConfig {
            algorithm: "HS256".to_string(),
            secret_key: "integration-test-secret".to_string(),
            private_key: String::new(),
            public_key: String::new(),
            access_token_expiry_secs: 3600,
            refresh_token_expiry_secs: 86400 * 30,
            leeway_secs: 30,
        },
        cookies: CookieConfig::default(),
        features: FeaturesConfig {
            all_contacts_enabled: false,
        },
    }
}

/// Create a test database pool, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    persistence::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// A router wired to the test database.
pub struct TestContext {
    pub pool: PgPool,
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Option<Self> {
        Self::with_config(|_| {}).await
    }

    /// Builds the context after letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Option<Self> {
        let pool = create_test_pool().await?;
        let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

        let mut config = test_config(&database_url);
        adjust(&mut config);

        let state = AppState::new(config, pool.clone()).expect("Failed to build app state");
        let app = create_app(state.clone());

        Some(Self { pool, state, app })
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends the request and returns the status with the parsed JSON body.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, parse_response_body(response).await)
    }

    /// Signs a user up, marks the email confirmed and logs in.
    pub async fn confirmed_user(&self) -> AuthedUser {
        let user = TestUser::new();

        let (status, _) = self
            .send_json(json_request(Method::POST, "/api/v1/auth/signup", user.signup_body()))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        sqlx::query("UPDATE users SET confirmed = TRUE WHERE email = $1")
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .unwrap();

        let (status, body) = self
            .send_json(json_request(Method::POST, "/api/v1/auth/login", user.login_body()))
            .await;
        assert_eq!(status, StatusCode::OK);

        AuthedUser {
            access_token: body["accessToken"].as_str().unwrap().to_string(),
            refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
            user,
        }
    }

    /// Removes a test user; their contacts go with them.
    pub async fn cleanup_user(&self, email: &str) {
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

/// Generate a unique email for testing.
pub fn unique_test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Test user data.
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn new() -> Self {
        Self {
            username: "Test User".to_string(),
            email: unique_test_email(),
            password: TEST_PASSWORD.to_string(),
        }
    }

    pub fn signup_body(&self) -> Value {
        json!({
            "username": self.username,
            "email": self.email,
            "password": self.password,
        })
    }

    pub fn login_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
        })
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new()
    }
}

/// A confirmed, logged-in test user.
pub struct AuthedUser {
    pub user: TestUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Helper to create a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to create a JSON request with a bearer token.
pub fn authed_json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to create a body-less request with a bearer token.
pub fn authed_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// A valid contact payload with a unique email.
pub fn contact_body(name: &str) -> Value {
    json!({
        "name": name,
        "surname": "Shevchenko",
        "email": unique_test_email(),
        "phone": "+380501234567",
        "birthday": "1990-03-09",
        "city": "Kyiv",
        "notes": "met at the conference",
    })
}
