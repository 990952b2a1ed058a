use std::sync::Arc;

use trinity_worker::ScanRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: trinity_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Background executor for C2 scans.
    pub scan_runner: ScanRunner,
}
