use std::path::{Path, PathBuf};
use std::time::Duration;

use trinity_core::detection::{DetectorConfig, DEFAULT_FLOOD_THRESHOLD, DEFAULT_FLOOD_WINDOW_SECS};
use trinity_core::env::{self, EnvError};

pub const BLACKLIST_FILE: &str = "blacklist.txt";
pub const ALERTS_LOG_FILE: &str = "blue_trinity_alerts.log";
pub const REPORTS_DIR: &str = "blue_trinity_reports";

/// Shortest period between manager passes.
pub const MIN_MANAGER_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest period between access-log polls.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Manager period for `secs`, never below [`MIN_MANAGER_INTERVAL`].
pub fn manager_interval_secs(secs: u64) -> Duration {
    Duration::from_secs(secs).max(MIN_MANAGER_INTERVAL)
}

/// Poll period for `millis`, never below [`MIN_POLL_INTERVAL`].
pub fn poll_interval_millis(millis: u64) -> Duration {
    Duration::from_millis(millis).max(MIN_POLL_INTERVAL)
}

/// Sentinel configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Directory holding the blacklist, alert log and reports.
    pub data_dir: PathBuf,
    /// Access log to monitor.
    pub log_file: PathBuf,
    pub detector: DetectorConfig,
    pub poll_interval: Duration,
    /// Period between manager passes in `run` mode.
    pub manager_interval: Duration,
    pub port: u16,
    /// Needed by the manager only.
    pub database_url: Option<String>,
}

impl SentinelConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default              |
    /// |-------------------------|----------------------|
    /// | `SENTINEL_DATA_DIR`     | `.`                  |
    /// | `SENTINEL_LOG_FILE`     | `<data>/access.log`  |
    /// | `DOS_THRESHOLD`         | `50`                 |
    /// | `DOS_WINDOW_SECS`       | `60`                 |
    /// | `MONITOR_POLL_MS`       | `1000`               |
    /// | `MANAGER_INTERVAL_SECS` | `86400`              |
    /// | `SENTINEL_PORT`         | `8000`               |
    /// | `DATABASE_URL`          | unset                |
    ///
    /// Intervals below the minimums are raised to them; malformed numbers
    /// are errors.
    pub fn from_env() -> Result<Self, EnvError> {
        let data_dir = PathBuf::from(env::optional("SENTINEL_DATA_DIR").unwrap_or_else(|| ".".into()));
        let log_file = env::optional("SENTINEL_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("access.log"));

        Ok(Self {
            log_file,
            detector: DetectorConfig {
                flood_threshold: env::var_or("DOS_THRESHOLD", DEFAULT_FLOOD_THRESHOLD)?,
                flood_window: chrono::Duration::seconds(env::var_or(
                    "DOS_WINDOW_SECS",
                    DEFAULT_FLOOD_WINDOW_SECS,
                )?),
            },
            poll_interval: poll_interval_millis(env::var_or("MONITOR_POLL_MS", 1000)?),
            manager_interval: manager_interval_secs(env::var_or("MANAGER_INTERVAL_SECS", 86_400)?),
            port: env::var_or("SENTINEL_PORT", 8000)?,
            database_url: env::optional("DATABASE_URL"),
            data_dir,
        })
    }

    /// Defaults rooted at `data_dir`, ignoring the environment.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            log_file: data_dir.join("access.log"),
            detector: DetectorConfig::default(),
            poll_interval: Duration::from_secs(1),
            manager_interval: Duration::from_secs(86_400),
            port: 8000,
            database_url: None,
            data_dir,
        }
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.data_dir.join(BLACKLIST_FILE)
    }

    pub fn alerts_log_path(&self) -> PathBuf {
        self.data_dir.join(ALERTS_LOG_FILE)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_data_dir() {
        let config = SentinelConfig::with_data_dir("/srv/blue");
        assert_eq!(config.blacklist_path(), Path::new("/srv/blue/blacklist.txt"));
        assert_eq!(config.alerts_log_path(), Path::new("/srv/blue/blue_trinity_alerts.log"));
        assert_eq!(config.reports_dir(), Path::new("/srv/blue/blue_trinity_reports"));
        assert_eq!(config.log_file, Path::new("/srv/blue/access.log"));
    }

    #[test]
    fn zero_intervals_are_clamped() {
        assert_eq!(manager_interval_secs(0), MIN_MANAGER_INTERVAL);
        assert_eq!(manager_interval_secs(90), Duration::from_secs(90));
        assert_eq!(poll_interval_millis(0), MIN_POLL_INTERVAL);
        assert_eq!(poll_interval_millis(250), Duration::from_millis(250));
    }
}
