#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use trinity_api::auth::jwt::{issue_access_token, JwtConfig};
use trinity_api::config::ServerConfig;
use trinity_api::middleware::access_log::AccessLogWriter;
use trinity_api::router::build_app_router;
use trinity_api::state::AppState;
use trinity_core::scan::TargetPolicy;
use trinity_db::models::user::{CreateUser, User};
use trinity_db::repositories::UserRepo;
use trinity_worker::{RunnerConfig, ScanRunner};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        access_log_path: None,
        scan_targets: TargetPolicy::default(),
    }
}

/// Runner settings that never launch a real scanner.
pub fn dry_run_config() -> RunnerConfig {
    RunnerConfig {
        dry_run: true,
        sqlmap_path: PathBuf::from("/nonexistent/sqlmap.py"),
        ..RunnerConfig::default()
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), None)
}

/// Like [`build_test_app`] with an explicit config and optional access log.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    access_log: Option<Arc<AccessLogWriter>>,
) -> Router {
    let state = AppState {
        scan_runner: ScanRunner::new(pool.clone(), dry_run_config()),
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config, access_log)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role and return it with a valid access token.
///
/// The password hash is a placeholder; use the login endpoint only with
/// users created through `/auth/register`.
pub async fn create_user_with_token(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@trinity.test")),
            password_hash: "not-a-real-hash".to_string(),
            role: role.to_string(),
            department_id: None,
        },
    )
    .await
    .expect("user creation should succeed");

    let token = issue_access_token(user.id, &user.username, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
