//! Handlers for HR `/employees` records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use trinity_core::status::{validate_employee_role, validate_employee_status};
use trinity_core::types::DbId;
use trinity_db::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use trinity_db::repositories::EmployeeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmployeeStatusRequest {
    pub status: String,
}

fn validate_fields(
    name: Option<&str>,
    role: Option<&str>,
    status: Option<&str>,
) -> AppResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Employee name must not be empty"));
    }
    if let Some(role) = role {
        validate_employee_role(role)?;
    }
    if let Some(status) = status {
        validate_employee_status(status)?;
    }
    Ok(())
}

/// POST /api/v1/employees
pub async fn create(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<DataResponse<Employee>>)> {
    validate_fields(
        Some(input.name.as_str()),
        input.role.as_deref(),
        input.status.as_deref(),
    )?;
    let employee = EmployeeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: employee })))
}

/// GET /api/v1/employees
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Employee>>>> {
    let employees = EmployeeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: employees }))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Employee>>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;
    Ok(Json(DataResponse { data: employee }))
}

/// PUT /api/v1/employees/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<DataResponse<Employee>>> {
    validate_fields(
        input.name.as_deref(),
        input.role.as_deref(),
        input.status.as_deref(),
    )?;
    let employee = EmployeeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;
    Ok(Json(DataResponse { data: employee }))
}

/// PUT /api/v1/employees/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<EmployeeStatusRequest>,
) -> AppResult<Json<DataResponse<Employee>>> {
    validate_employee_status(&input.status)?;
    let employee = EmployeeRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;
    tracing::info!(employee_id = id, manager_id = manager.user_id, status = %employee.status, "Employee status set");
    Ok(Json(DataResponse { data: employee }))
}

/// DELETE /api/v1/employees/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if EmployeeRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Employee", id))
    }
}
