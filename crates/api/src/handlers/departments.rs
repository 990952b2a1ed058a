//! Handlers for the `/departments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use trinity_core::types::DbId;
use trinity_db::models::department::{CreateDepartment, Department, UpdateDepartment};
use trinity_db::repositories::DepartmentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Department name must not be empty"));
    }
    Ok(())
}

/// POST /api/v1/departments
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(input): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<DataResponse<Department>>)> {
    validate_name(&input.name)?;
    let department = DepartmentRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: department })))
}

/// GET /api/v1/departments
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Department>>>> {
    let departments = DepartmentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: departments }))
}

/// GET /api/v1/departments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Department>>> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))?;
    Ok(Json(DataResponse { data: department }))
}

/// PUT /api/v1/departments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDepartment>,
) -> AppResult<Json<DataResponse<Department>>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    let department = DepartmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))?;
    Ok(Json(DataResponse { data: department }))
}

/// DELETE /api/v1/departments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DepartmentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Department", id))
    }
}
