//! Handlers for the `/tasks` resource.
//!
//! Managers and admins see and edit every task. Employees only see tasks
//! they are assigned to and may only change the status of those.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use trinity_core::status::{validate_task_priority, validate_task_status, validate_task_title};
use trinity_core::types::DbId;
use trinity_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use trinity_db::repositories::{TaskRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub assignee: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `PUT /tasks/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Deduplicate assignee ids and check that every one is an existing user.
async fn resolve_assignees(state: &AppState, ids: &[DbId]) -> AppResult<Vec<DbId>> {
    let wanted: Vec<DbId> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if wanted.is_empty() {
        return Ok(wanted);
    }
    let found = UserRepo::existing_ids(&state.pool, &wanted).await?;
    let missing: Vec<DbId> = wanted
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::validation(format!("Unknown assignee ids: {missing:?}")));
    }
    Ok(wanted)
}

async fn load(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
///
/// Supports `?status=&assignee=&limit=&offset=`. For employees the assignee
/// filter is always their own id.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    if let Some(status) = &params.status {
        validate_task_status(status)?;
    }
    let filter = TaskFilter {
        status: params.status,
        assignee: if user.is_manager() {
            params.assignee
        } else {
            Some(user.user_id)
        },
    };
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let tasks = TaskRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Json(mut input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    validate_task_title(&input.title)?;
    if let Some(status) = &input.status {
        validate_task_status(status)?;
    }
    if let Some(priority) = &input.priority {
        validate_task_priority(priority)?;
    }
    input.assignees = resolve_assignees(&state, &input.assignees).await?;

    let task = TaskRepo::create(&state.pool, manager.user_id, &input).await?;
    tracing::info!(task_id = task.id, creator_id = manager.user_id, "Task created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = load(&state, id).await?;
    if !user.is_manager() && !task.is_assigned_to(user.user_id) {
        return Err(AppError::forbidden("Task is not assigned to you"));
    }
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    if let Some(title) = &input.title {
        validate_task_title(title)?;
    }
    if let Some(status) = &input.status {
        validate_task_status(status)?;
    }
    if let Some(priority) = &input.priority {
        validate_task_priority(priority)?;
    }
    if let Some(assignees) = input.assignees.take() {
        input.assignees = Some(resolve_assignees(&state, &assignees).await?);
    }

    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}/status
///
/// Allowed for the task's assignees and for managers/admins.
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TaskStatusRequest>,
) -> AppResult<Json<DataResponse<Task>>> {
    validate_task_status(&input.status)?;
    let task = load(&state, id).await?;
    if !user.is_manager() && !task.is_assigned_to(user.user_id) {
        return Err(AppError::forbidden("Only assignees or managers may update this task"));
    }

    let task = TaskRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    tracing::info!(task_id = id, user_id = user.user_id, status = %task.status, "Task status changed");
    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TaskRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Task", id))
    }
}
