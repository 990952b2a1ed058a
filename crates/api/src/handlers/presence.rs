//! Handlers for daily `/presence` marks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use trinity_core::types::{DbId, Timestamp};
use trinity_db::repositories::PresenceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PresenceMark {
    pub user_id: DbId,
    pub date: NaiveDate,
    /// When the day's first mark was recorded.
    pub marked_at: Timestamp,
    /// `false` when the user had already marked presence today.
    pub newly_marked: bool,
}

#[derive(Debug, Serialize)]
pub struct PresentToday {
    pub date: NaiveDate,
    pub user_ids: Vec<DbId>,
}

/// POST /api/v1/presence
///
/// Mark the caller present for the current UTC day. Idempotent: returns 201
/// on the first mark of the day and 200 afterwards.
pub async fn mark(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<DataResponse<PresenceMark>>)> {
    let today = Utc::now().date_naive();
    let newly_marked = PresenceRepo::mark(&state.pool, user.user_id, today).await?;
    let recorded = PresenceRepo::find(&state.pool, user.user_id, today)
        .await?
        .ok_or_else(|| AppError::InternalError("Presence mark vanished after insert".into()))?;
    let status = if newly_marked {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: PresenceMark {
                user_id: user.user_id,
                date: today,
                marked_at: recorded.created_at,
                newly_marked,
            },
        }),
    ))
}

/// GET /api/v1/presence/today
pub async fn today(
    State(state): State<AppState>,
    RequireManager(_): RequireManager,
) -> AppResult<Json<DataResponse<PresentToday>>> {
    let date = Utc::now().date_naive();
    let user_ids = PresenceRepo::user_ids_on(&state.pool, date).await?;
    Ok(Json(DataResponse {
        data: PresentToday { date, user_ids },
    }))
}
