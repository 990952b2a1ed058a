//! Handlers for the chat `/messages` feed.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use trinity_core::pagination::{clamp_limit, DEFAULT_LIMIT, MAX_LIMIT};
use trinity_core::status::validate_message_content;
use trinity_db::models::message::Message;
use trinity_db::repositories::MessageRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// GET /api/v1/messages
///
/// The most recent `limit` messages (default 50, max 200), oldest first.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let messages = MessageRepo::recent(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/messages
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    validate_message_content(&input.content)?;
    let message = MessageRepo::create(&state.pool, user.user_id, &input.content).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}
