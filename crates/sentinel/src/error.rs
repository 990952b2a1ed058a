/// Errors raised by the sentinel's file and database work.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
