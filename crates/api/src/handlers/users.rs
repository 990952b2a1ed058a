//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use trinity_core::roles::validate_role;
use trinity_core::status::validate_user_status;
use trinity_core::types::DbId;
use trinity_db::models::user::{UpdateProfile, UpdateUser, UserResponse};
use trinity_db::repositories::UserRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::validation::validate_request;

/// Request body for `PUT /users/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub phone_number: Option<String>,
}

/// Request body for `PUT /users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.user_id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_request(&input)?;
    let profile = UpdateProfile {
        email: input.email,
        phone_number: input.phone_number,
    };
    let row = UserRepo::update_profile(&state.pool, user.user_id, &profile)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.user_id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (limit, offset) = params.resolve();
    let users = UserRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let row = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse { data: row.into() }))
}

/// PUT /api/v1/users/{id}
///
/// Admin-only: change role, department or status.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(role) = &input.role {
        validate_role(role)?;
    }
    if let Some(status) = &input.status {
        validate_user_status(status)?;
    }
    let row = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    Ok(Json(DataResponse { data: row.into() }))
}

/// PUT /api/v1/users/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_user_status(&input.status)?;
    let row = UserRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse { data: row.into() }))
}
