//! HTTP-level tests for the task board: role scoping, assignee validation
//! and status changes.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user_with_token, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn create_task(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = post_json_auth(common::build_test_app(pool.clone()), "/api/v1/tasks", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn manager_creates_task_with_defaults(pool: PgPool) {
    let (manager, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let (worker, _) = create_user_with_token(&pool, "wrk", "employee").await;

    let task = create_task(
        &pool,
        &token,
        json!({ "title": "Inventory count", "assignees": [worker.id, worker.id] }),
    )
    .await;

    assert_eq!(task["title"], "Inventory count");
    assert_eq!(task["status"], "Todo");
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["creator_id"], manager.id);
    // Duplicate assignees are collapsed.
    assert_eq!(task["assignees"], json!([worker.id]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn employee_cannot_create_tasks(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "wrk", "employee").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/tasks",
        json!({ "title": "Sneaky" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_assignee_is_rejected(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/tasks",
        json!({ "title": "Ghost work", "assignees": [999_999] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("999999"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_priority_is_rejected(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/tasks",
        json!({ "title": "Hot", "priority": "Urgent" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn employees_only_see_their_tasks(pool: PgPool) {
    let (_, mgr_token) = create_user_with_token(&pool, "mgr", "manager").await;
    let (alice, alice_token) = create_user_with_token(&pool, "alice", "employee").await;
    let (bob, _) = create_user_with_token(&pool, "bob", "employee").await;

    create_task(&pool, &mgr_token, json!({ "title": "A", "assignees": [alice.id] })).await;
    let bobs = create_task(&pool, &mgr_token, json!({ "title": "B", "assignees": [bob.id] })).await;

    // Asking for someone else's tasks is silently narrowed to your own.
    let uri = format!("/api/v1/tasks?assignee={}", bob.id);
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &alice_token).await;
    let json = body_json(response).await;
    let titles: Vec<_> = json["data"].as_array().unwrap().iter().map(|t| t["title"].clone()).collect();
    assert_eq!(titles, vec![json!("A")]);

    let uri = format!("/api/v1/tasks/{}", bobs["id"]);
    let response = get_auth(common::build_test_app(pool.clone()), &uri, &alice_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(common::build_test_app(pool), "/api/v1/tasks", &mgr_token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn manager_filters_by_status(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    create_task(&pool, &token, json!({ "title": "Open" })).await;
    create_task(&pool, &token, json!({ "title": "Closed", "status": "Done" })).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/tasks?status=Done", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Closed");

    let response = get_auth(common::build_test_app(pool), "/api/v1/tasks?status=Bogus", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Status updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn assignee_can_change_status_but_others_cannot(pool: PgPool) {
    let (_, mgr_token) = create_user_with_token(&pool, "mgr", "manager").await;
    let (alice, alice_token) = create_user_with_token(&pool, "alice", "employee").await;
    let (_, bob_token) = create_user_with_token(&pool, "bob", "employee").await;

    let task = create_task(&pool, &mgr_token, json!({ "title": "Mop", "assignees": [alice.id] })).await;
    let uri = format!("/api/v1/tasks/{}/status", task["id"]);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "status": "In Progress" }),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "In Progress");

    let response = put_json_auth(
        common::build_test_app(pool),
        &uri,
        json!({ "status": "Done" }),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_task(pool: PgPool) {
    let (_, token) = create_user_with_token(&pool, "mgr", "manager").await;
    let task = create_task(&pool, &token, json!({ "title": "Draft" })).await;
    let uri = format!("/api/v1/tasks/{}", task["id"]);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "title": "Final", "priority": "High" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Final");
    assert_eq!(json["data"]["priority"], "High");

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
