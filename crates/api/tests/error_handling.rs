//! Error responses share one JSON shape: `{ "error": ..., "code": ... }`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_user_with_token, get_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_entity_is_404_with_code(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/tasks/424242", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Task with id 424242 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_rejected(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tasks")
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = common::build_test_app(pool).oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_department_reference_is_validation_error(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "root", "admin").await;
    let uri = format!("/api/v1/users/{}", user.id);

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        json!({ "department_id": 999_999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Department does not exist");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_user_status_lists_allowed_values(pool: PgPool) {
    let (user, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let uri = format!("/api/v1/users/{}/status", user.id);

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        json!({ "status": "Vacation" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Active, Absent, On Leave"));
}
