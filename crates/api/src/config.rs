use std::path::PathBuf;

use trinity_core::env::{self, EnvError};
use trinity_core::scan::TargetPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Common Log Format output consumed by the sentinel. Disabled when unset.
    pub access_log_path: Option<PathBuf>,
    /// Allow-lists applied to scan targets.
    pub scan_targets: TargetPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `ACCESS_LOG_PATH`      | unset                      |
    /// | `ALLOWED_TARGETS`      | empty (no restriction)     |
    /// | `ALLOWED_PREFIXES`     | empty (no restriction)     |
    ///
    /// Malformed numbers and a missing `JWT_SECRET` are errors.
    pub fn from_env() -> Result<Self, EnvError> {
        let cors_origins = env::optional("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let scan_targets = TargetPolicy::from_lists(
            &env::optional("ALLOWED_TARGETS").unwrap_or_default(),
            &env::optional("ALLOWED_PREFIXES").unwrap_or_default(),
        );

        Ok(Self {
            host: env::optional("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env::var_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: env::var_or("REQUEST_TIMEOUT_SECS", 30)?,
            jwt: JwtConfig::from_env()?,
            access_log_path: env::optional("ACCESS_LOG_PATH").map(PathBuf::from),
            scan_targets,
        })
    }
}
