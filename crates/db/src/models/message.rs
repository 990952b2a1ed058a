use serde::Serialize;
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// A chat message joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub content: String,
    pub user_id: Option<DbId>,
    pub username: Option<String>,
    pub created_at: Timestamp,
}
