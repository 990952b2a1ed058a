use trinity_core::error::CoreError;

/// Errors raised while running a scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{program} is not installed")]
    ToolMissing { program: String },

    #[error("Scan timed out")]
    Timeout,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
