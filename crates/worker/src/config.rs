use std::path::{Path, PathBuf};
use std::time::Duration;

use trinity_core::env::{self, EnvError};

/// Scan runner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Record the command without executing it (default: `false`).
    pub dry_run: bool,
    /// Wall-clock budget per scan (default: 300 s).
    pub max_scan_time: Duration,
    /// Maximum number of scans executing at once (default: `4`).
    pub max_concurrent: usize,
    /// Location of `sqlmap.py` (default: `/opt/sqlmap/sqlmap.py`).
    pub sqlmap_path: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_scan_time: Duration::from_secs(300),
            max_concurrent: 4,
            sqlmap_path: PathBuf::from("/opt/sqlmap/sqlmap.py"),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `DRY_RUN`              | `false`                  |
    /// | `MAX_SCAN_TIME`        | `300`                    |
    /// | `MAX_CONCURRENT_SCANS` | `4`                      |
    /// | `SQLMAP_PATH`          | `/opt/sqlmap/sqlmap.py`  |
    ///
    /// A malformed number is an error; a concurrency of `0` is raised to `1`.
    pub fn from_env() -> Result<Self, EnvError> {
        let defaults = Self::default();

        let dry_run = env::optional("DRY_RUN")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.dry_run);
        let max_scan_time = Duration::from_secs(env::var_or(
            "MAX_SCAN_TIME",
            defaults.max_scan_time.as_secs(),
        )?);
        let max_concurrent: usize = env::var_or("MAX_CONCURRENT_SCANS", defaults.max_concurrent)?;
        let sqlmap_path = env::optional("SQLMAP_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.sqlmap_path);

        Ok(Self {
            dry_run,
            max_scan_time,
            max_concurrent: max_concurrent.max(1),
            sqlmap_path,
        })
    }

    /// The sqlmap script, if it is installed on this host.
    pub fn sqlmap_script(&self) -> Option<&Path> {
        self.sqlmap_path
            .is_file()
            .then_some(self.sqlmap_path.as_path())
    }
}

/// `1`, `true`, `yes` and `on` (any case) enable a flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
