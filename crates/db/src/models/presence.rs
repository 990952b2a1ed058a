use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// A row from the `presence` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Presence {
    pub id: DbId,
    pub user_id: DbId,
    pub marked_on: NaiveDate,
    pub created_at: Timestamp,
}
