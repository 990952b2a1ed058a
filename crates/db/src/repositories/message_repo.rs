//! Repository for the append-only `messages` table.

use sqlx::PgPool;
use trinity_core::types::DbId;

use crate::models::message::Message;

pub struct MessageRepo;

impl MessageRepo {
    /// Append a message, returning it with the author's username.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "WITH inserted AS (
                INSERT INTO messages (content, user_id) VALUES ($1, $2)
                RETURNING id, content, user_id, created_at
             )
             SELECT i.id, i.content, i.user_id, u.username, i.created_at
             FROM inserted i LEFT JOIN users u ON u.id = i.user_id",
        )
        .bind(content)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// The `limit` most recent messages, returned oldest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM (
                SELECT m.id, m.content, m.user_id, u.username, m.created_at
                FROM messages m LEFT JOIN users u ON u.id = m.user_id
                ORDER BY m.created_at DESC, m.id DESC
                LIMIT $1
             ) recent
             ORDER BY created_at ASC, id ASC",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
