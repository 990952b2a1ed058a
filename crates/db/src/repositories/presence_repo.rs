//! Repository for the `presence` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use trinity_core::types::DbId;

use crate::models::presence::Presence;

pub struct PresenceRepo;

impl PresenceRepo {
    /// Mark `user_id` present on `day`.
    ///
    /// Idempotent: returns `true` only when a new mark was recorded.
    pub async fn mark(pool: &PgPool, user_id: DbId, day: NaiveDate) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO presence (user_id, marked_on) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_presence_user_day DO NOTHING",
        )
        .bind(user_id)
        .bind(day)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<Presence>, sqlx::Error> {
        sqlx::query_as::<_, Presence>(
            "SELECT id, user_id, marked_on, created_at FROM presence
             WHERE user_id = $1 AND marked_on = $2",
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(pool)
        .await
    }

    /// User ids with a mark on `day`, ascending.
    pub async fn user_ids_on(pool: &PgPool, day: NaiveDate) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM presence WHERE marked_on = $1 ORDER BY user_id",
        )
        .bind(day)
        .fetch_all(pool)
        .await
    }
}
