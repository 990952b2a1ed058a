//! The access-log middleware writes lines the sentinel can parse.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;
use trinity_api::middleware::access_log::AccessLogWriter;
use trinity_core::access_log::{extract_ip, extract_path};

#[sqlx::test(migrations = "../../db/migrations")]
async fn each_response_appends_a_common_log_line(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");
    let writer = Arc::new(AccessLogWriter::open(&path).await.unwrap());

    let app = common::build_test_app_with(pool, common::test_config(), Some(writer));
    let request = Request::builder()
        .uri("/api/v1/tasks?q=1%20UNION%20SELECT")
        .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
        .header("User-Agent", "curl/8.5.0")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(extract_ip(lines[0]), Some("203.0.113.7"));
    assert_eq!(extract_path(lines[0]), Some("/api/v1/tasks?q=1%20UNION%20SELECT"));
    assert!(lines[0].contains("\" 401 "));
    assert!(lines[0].ends_with("\"curl/8.5.0\""));
}
