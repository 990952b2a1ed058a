//! Handlers for C2 `/scans`.
//!
//! Admin-only. Only run scans against hosts you own or are authorised to
//! test; `ALLOWED_TARGETS` / `ALLOWED_PREFIXES` narrow what is accepted.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use trinity_core::pagination::{clamp_limit, DEFAULT_LIMIT, MAX_LIMIT};
use trinity_core::scan::ScanType;
use trinity_db::models::scan::{CreateScan, Scan};
use trinity_db::repositories::ScanRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /scans`.
#[derive(Debug, Deserialize)]
pub struct StartScanRequest {
    pub target: String,
    #[serde(rename = "type")]
    pub scan_type: String,
}

/// Response for an accepted scan.
#[derive(Debug, Serialize)]
pub struct ScanStarted {
    pub status: &'static str,
    pub scan_id: Uuid,
}

/// POST /api/v1/scans
///
/// Validate and enqueue a scan. Returns 202 immediately; poll
/// `GET /scans/{id}` for the result.
pub async fn start(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<StartScanRequest>,
) -> AppResult<(StatusCode, Json<ScanStarted>)> {
    let scan_type = ScanType::parse(&input.scan_type)?;
    let target = state.config.scan_targets.validate(&input.target)?.to_string();

    let scan = ScanRepo::create(
        &state.pool,
        &CreateScan {
            target: target.clone(),
            scan_type: scan_type.as_str().to_string(),
            requested_by: Some(admin.user_id),
        },
    )
    .await?;

    tracing::info!(
        scan_id = %scan.scan_uuid,
        %target,
        scan_type = %scan_type,
        admin_id = admin.user_id,
        "Scan accepted"
    );
    state.scan_runner.submit(scan.id, target, scan_type);

    Ok((
        StatusCode::ACCEPTED,
        Json(ScanStarted {
            status: "started",
            scan_id: scan.scan_uuid,
        }),
    ))
}

/// GET /api/v1/scans
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Scan>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let scans = ScanRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: scans }))
}

/// GET /api/v1/scans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Scan>>> {
    let uuid = Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid scan id".into()))?;
    let scan = ScanRepo::find_by_uuid(&state.pool, uuid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Scan {uuid} not found")))?;
    Ok(Json(DataResponse { data: scan }))
}
