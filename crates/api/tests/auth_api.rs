//! HTTP-level tests for registration, login, token refresh and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "correct-horse-battery";

async fn register(app: axum::Router, username: &str) -> serde_json::Value {
    let body = json!({ "username": username, "password": PASSWORD, "email": format!("{username}@trinity.test") });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn login(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_employee_without_exposing_hash(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = register(app, "alice").await;

    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["role"], "employee");
    assert_eq!(json["data"]["status"], "Active");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "bob", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("password"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_trims_username_before_validating(pool: PgPool) {
    // One character of name, padded past the minimum length.
    let body = json!({ "username": "   a   ", "password": PASSWORD });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let body = json!({ "username": "  dora  ", "password": PASSWORD });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["username"], "dora");

    let json = login(common::build_test_app(pool), " dora ", PASSWORD).await;
    assert_eq!(json["user"]["username"], "dora");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_conflict(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "carol").await;

    let body = json!({ "username": "carol", "password": PASSWORD });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Username is already taken");
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_tokens_and_user(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "dave").await;
    let json = login(common::build_test_app(pool), "dave", PASSWORD).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "dave");
    assert_eq!(json["user"]["role"], "employee");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "erin").await;

    let body = json!({ "username": "erin", "password": "not-the-password" });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_unknown_user_is_unauthorized(pool: PgPool) {
    let body = json!({ "username": "ghost", "password": PASSWORD });
    let response = post_json(common::build_test_app(pool), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_token(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "frank").await;
    let tokens = login(common::build_test_app(pool.clone()), "frank", PASSWORD).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    // The old token was revoked by the rotation.
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "gina").await;
    let tokens = login(common::build_test_app(pool.clone()), "gina", PASSWORD).await;
    let access = tokens["access_token"].as_str().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/auth/logout",
        json!({}),
        access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": tokens["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Bearer token handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let response = get_auth(common::build_test_app(pool), "/api/v1/users/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_own_profile(pool: PgPool) {
    let (user, token) = common::create_user_with_token(&pool, "henry", "manager").await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/users/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["role"], "manager");
}
