//! Read-only HTTP surface for the Blue Trinity dashboard.

use std::fmt::Write as _;
use std::path::PathBuf;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use trinity_core::attendance::HealthSummary;
use trinity_core::detection::SecurityAlert;

use crate::blacklist;
use crate::error::SentinelError;
use crate::manager::SharedSummary;

/// Alerts returned by `/alerts` and rendered on `/`.
pub const RECENT_ALERTS: usize = 50;

#[derive(Clone)]
pub struct SentinelState {
    pub summary: SharedSummary,
    pub blacklist_path: PathBuf,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    summary: HealthSummary,
    blacklisted_ips: usize,
}

#[derive(Serialize)]
struct AlertsResponse {
    alerts: Vec<SecurityAlert>,
    count: usize,
}

impl IntoResponse for SentinelError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "An internal error occurred" })),
        )
            .into_response()
    }
}

/// GET /health
async fn health(State(state): State<SentinelState>) -> Result<Json<HealthResponse>, SentinelError> {
    let blacklisted_ips = blacklist::distinct_ips(&state.blacklist_path).await?;
    Ok(Json(HealthResponse {
        status: "ok",
        summary: state.summary.read().await.clone(),
        blacklisted_ips,
    }))
}

/// GET /alerts
async fn alerts(State(state): State<SentinelState>) -> Result<Json<AlertsResponse>, SentinelError> {
    let alerts = blacklist::recent(&state.blacklist_path, RECENT_ALERTS).await?;
    Ok(Json(AlertsResponse {
        count: alerts.len(),
        alerts,
    }))
}

/// GET /api/stats
async fn stats(State(state): State<SentinelState>) -> Result<Json<serde_json::Value>, SentinelError> {
    let alert_count = blacklist::read_entries(&state.blacklist_path).await?.len();
    let summary = state.summary.read().await.clone();
    Ok(Json(json!({ "summary": summary, "alert_count": alert_count })))
}

/// GET /
async fn dashboard(State(state): State<SentinelState>) -> Result<Html<String>, SentinelError> {
    let alerts = blacklist::recent(&state.blacklist_path, RECENT_ALERTS).await?;
    Ok(Html(render_dashboard(&alerts)))
}

/// Minimal HTML table of alerts, newest first. Every value is escaped;
/// the payloads are attacker-controlled.
pub fn render_dashboard(alerts: &[SecurityAlert]) -> String {
    let mut rows = String::new();
    for alert in alerts.iter().rev() {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&alert.time.to_rfc3339()),
            escape_html(&alert.reason),
            escape_html(alert.ip.as_deref().unwrap_or("-")),
            escape_html(alert.path.as_deref().unwrap_or("-")),
        );
    }
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Blue Trinity</title></head>\
         <body><h1>Blue Trinity</h1><p>{} recent alerts</p>\
         <table><thead><tr><th>Time</th><th>Reason</th><th>IP</th><th>Path</th></tr></thead>\
         <tbody>{rows}</tbody></table></body></html>",
        alerts.len()
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn build_router(state: SentinelState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/alerts", get(alerts))
        .route("/api/stats", get(stats))
        .layer(cors)
        .with_state(state)
}
