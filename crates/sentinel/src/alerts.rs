//! Human-readable alert log (`blue_trinity_alerts.log`).

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use tokio::io::AsyncWriteExt;
use trinity_core::detection::SecurityAlert;

use crate::error::SentinelError;

/// `[ALERT] <reason> | ip=<ip> | path=<path> | time=<iso>`; unknown fields
/// render as `-`.
pub fn format_alert(alert: &SecurityAlert) -> String {
    format!(
        "[ALERT] {} | ip={} | path={} | time={}",
        alert.reason,
        alert.ip.as_deref().unwrap_or("-"),
        alert.path.as_deref().unwrap_or("-"),
        alert.time.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

#[derive(Debug, Clone)]
pub struct AlertLog {
    path: PathBuf,
}

impl AlertLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, alert: &SecurityAlert) -> Result<(), SentinelError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", format_alert(alert)).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use trinity_core::detection::AlertKind;

    use super::*;

    #[test]
    fn formats_known_and_missing_fields() {
        let mut alert = SecurityAlert {
            time: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            reason: "XSS Attempt Detected".into(),
            ip: Some("10.0.0.4".into()),
            path: None,
            line: String::new(),
            kind: AlertKind::Xss,
        };
        assert_eq!(
            format_alert(&alert),
            "[ALERT] XSS Attempt Detected | ip=10.0.0.4 | path=- | time=2026-03-01T12:00:00Z"
        );

        alert.ip = None;
        assert!(format_alert(&alert).contains("ip=- |"));
    }
}
