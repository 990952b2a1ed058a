//! HTTP error type. Every failure renders as `{"error": ..., "code": ...}`.
//!
//! Database errors on the schema's named constraints get wording a client
//! can act on; anything unexpected is logged and reported as a bare 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use trinity_core::error::CoreError;
use trinity_core::types::DbId;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A missing resource addressed by something other than a numeric id.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Forbidden(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Unauthorized(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Core(CoreError::Validation(msg.into()))
    }

    /// Status, machine-readable code and client-facing message.
    fn describe(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => describe_core(core),
            AppError::Database(err) => describe_database(err),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.describe();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn describe_core(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Client-facing wording for violations of the schema's constraints.
/// Inline foreign keys carry PostgreSQL's generated `<table>_<column>_fkey` names.
fn constraint_message(constraint: &str) -> Option<&'static str> {
    Some(match constraint {
        "uq_users_username" => "Username is already taken",
        "uq_users_email" => "Email is already registered",
        "uq_departments_name" => "A department with this name already exists",
        "uq_employees_user_id" => "That user already has an employee record",
        "users_department_id_fkey" => "Department does not exist",
        "fk_departments_manager_id" => "Manager does not exist",
        "employees_user_id_fkey" => "Linked user does not exist",
        "ck_users_role" => "Invalid role",
        "ck_users_status" => "Invalid user status",
        "ck_tasks_status" => "Invalid task status",
        "ck_tasks_priority" => "Invalid task priority",
        "ck_employees_role" => "Invalid employee role",
        "ck_employees_status" => "Invalid employee status",
        _ => return None,
    })
}

/// - `RowNotFound` → 404.
/// - Unique violation (`23505`) on a `uq_*` constraint → 409.
/// - Foreign key violation (`23503`) → 400, the referenced row is missing.
/// - Check violation (`23514`) on a `ck_*` constraint → 400.
/// - Anything else → 500.
fn describe_database(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string())
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    let wording = |fallback: &str| {
        constraint_message(constraint)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{fallback}: {constraint}"))
    };

    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            wording("Duplicate value violates unique constraint"),
        ),
        Some("23503") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            wording("Referenced record does not exist"),
        ),
        Some("23514") if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            wording("Value violates check constraint"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}
