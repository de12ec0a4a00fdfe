/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Two test users (requester and bystander) for ownership coverage
/// - JWT token generation
/// - Request helpers

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tasknest_api::app::{build_router, AppState};
use tasknest_api::config::Config;
use tasknest_shared::auth::jwt::{create_token, Claims, TokenType};
use tasknest_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub other_user: User,
    pub jwt_token: String,
    pub other_jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with two fresh users
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to this crate's Cargo.toml)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create two test users so ownership mismatches can be exercised
        let user = create_test_user(&db, "alice").await?;
        let other_user = create_test_user(&db, "bob").await?;

        let jwt_token = token_for(&config, user.id)?;
        let other_jwt_token = token_for(&config, other_user.id)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            other_user,
            jwt_token,
            other_jwt_token,
        })
    }

    /// Returns the primary user's authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Returns the second user's authorization header value
    pub fn other_auth_header(&self) -> String {
        format!("Bearer {}", self.other_jwt_token)
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("Router call should not fail")
    }

    /// Sends a JSON request with the given auth header
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        auth: &str,
        body: serde_json::Value,
    ) -> Response<axum::body::Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", auth)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Request should build");

        self.send(request).await
    }

    /// Sends a bodyless request with the given auth header
    pub async fn send_empty(
        &self,
        method: &str,
        uri: &str,
        auth: &str,
    ) -> Response<axum::body::Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", auth)
            .body(Body::empty())
            .expect("Request should build");

        self.send(request).await
    }

    /// Cleans up test data
    ///
    /// Deleting the users cascades to every category and task they own.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        User::delete(&self.db, self.other_user.id).await?;
        Ok(())
    }
}

/// Creates a user directly in the database
async fn create_test_user(db: &PgPool, prefix: &str) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            username: format!("{}-{}", prefix, Uuid::new_v4()),
            email: format!("{}-{}@example.com", prefix, Uuid::new_v4()),
            password_hash: "test_hash".to_string(), // Not used in tests
            phone: None,
            age: None,
        },
    )
    .await?;

    Ok(user)
}

/// Mints an access token for a user
fn token_for(config: &Config, user_id: Uuid) -> anyhow::Result<String> {
    let claims = Claims::new(user_id, TokenType::Access);
    Ok(create_token(&claims, &config.jwt.secret)?)
}

/// Parses a response body as JSON, panicking with the body text on failure
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "Body is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Asserts a status, printing the body when it differs
pub async fn assert_status(response: Response<axum::body::Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = body_json(response).await;

    assert_eq!(status, expected, "Unexpected status, body: {}", body);
    body
}
