//! The Defender: tails the access log and reacts to detections.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use trinity_core::detection::{Detector, SecurityAlert};
use trinity_core::types::Timestamp;

use crate::alerts::AlertLog;
use crate::blacklist::Blacklist;
use crate::config::{SentinelConfig, MIN_POLL_INTERVAL};
use crate::error::SentinelError;
use crate::tailer::LogTailer;

pub struct Monitor {
    tailer: LogTailer,
    detector: Detector,
    blacklist: Blacklist,
    alert_log: AlertLog,
}

impl Monitor {
    pub fn new(
        tailer: LogTailer,
        detector: Detector,
        blacklist: Blacklist,
        alert_log: AlertLog,
    ) -> Self {
        Self {
            tailer,
            detector,
            blacklist,
            alert_log,
        }
    }

    /// Build a monitor for `config`, positioned at the end of the access log.
    pub async fn from_config(config: &SentinelConfig) -> Result<Self, SentinelError> {
        Ok(Self::new(
            LogTailer::open_at_end(&config.log_file).await?,
            Detector::new(config.detector.clone()),
            Blacklist::open(config.blacklist_path()).await?,
            AlertLog::new(config.alerts_log_path()),
        ))
    }

    /// Inspect `lines` as if observed at `now`. Each alert is written to the
    /// alert log and, unless already recorded, the blacklist. The two writes
    /// are independent: a failure in either is logged and the batch carries on.
    pub async fn process(&mut self, lines: &[String], now: Timestamp) -> Vec<SecurityAlert> {
        let mut raised = Vec::new();
        for line in lines {
            for alert in self.detector.inspect(line, now) {
                tracing::warn!(
                    kind = alert.kind.as_str(),
                    ip = alert.ip.as_deref().unwrap_or("-"),
                    path = alert.path.as_deref().unwrap_or("-"),
                    "{}",
                    alert.reason
                );
                if let Err(e) = self.alert_log.append(&alert).await {
                    tracing::error!(
                        error = %e,
                        path = %self.alert_log.path().display(),
                        "Failed to append alert log"
                    );
                }
                if let Err(e) = self.blacklist.record(&alert).await {
                    tracing::error!(
                        error = %e,
                        path = %self.blacklist.path().display(),
                        "Failed to record blacklist entry"
                    );
                }
                raised.push(alert);
            }
        }
        raised
    }

    /// Read whatever is new in the log and process it.
    pub async fn poll_once(&mut self) -> Result<Vec<SecurityAlert>, SentinelError> {
        let lines = self.tailer.poll().await?;
        let now = Utc::now();
        let alerts = self.process(&lines, now).await;
        self.detector.prune(now);
        Ok(alerts)
    }

    /// Poll every `interval` (at least [`MIN_POLL_INTERVAL`]) until `cancel`
    /// fires. Errors are logged and the loop carries on.
    pub async fn run(mut self, interval: Duration, cancel: CancellationToken) {
        let interval = interval.max(MIN_POLL_INTERVAL);
        tracing::info!(
            log = %self.tailer.path().display(),
            interval_ms = interval.as_millis() as u64,
            "Monitor started"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Monitor stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        tracing::error!(error = %e, "Monitor poll failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use trinity_core::detection::{AlertKind, DetectorConfig};

    use super::*;
    use crate::blacklist;

    fn line(ip: &str, path: &str) -> String {
        format!(r#"{ip} - - [01/Mar/2026:12:00:00 +0000] "GET {path} HTTP/1.1" 200 5 "-" "t""#)
    }

    async fn monitor_in(dir: &std::path::Path, threshold: usize) -> (Monitor, SentinelConfig) {
        let mut config = SentinelConfig::with_data_dir(dir);
        config.detector = DetectorConfig {
            flood_threshold: threshold,
            flood_window: ChronoDuration::seconds(60),
        };
        (Monitor::from_config(&config).await.unwrap(), config)
    }

    #[tokio::test]
    async fn alerts_reach_log_and_blacklist_once() {
        let dir = tempfile::tempdir().unwrap();
        let (mut monitor, config) = monitor_in(dir.path(), 100).await;
        let attack = line("6.6.6.6", "/tasks?q=1%20union%20select");

        let now = Utc::now();
        let first = monitor.process(&[attack.clone()], now).await;
        let second = monitor.process(&[attack], now).await;
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);

        let log = tokio::fs::read_to_string(config.alerts_log_path()).await.unwrap();
        assert_eq!(log.lines().count(), 2);
        assert!(log.starts_with("[ALERT] SQL Injection Attempt Detected | ip=6.6.6.6 |"));

        let entries = blacklist::read_entries(&config.blacklist_path()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, AlertKind::SqlInjection);
    }

    #[tokio::test]
    async fn broken_alert_log_does_not_stop_blacklisting() {
        let dir = tempfile::tempdir().unwrap();
        let (mut monitor, config) = monitor_in(dir.path(), 100).await;
        tokio::fs::create_dir(config.alerts_log_path()).await.unwrap();

        let body = format!(
            "{}\n{}\n",
            line("6.6.6.6", "/tasks?q=drop"),
            line("7.7.7.7", "/chat?m=%3Cscript%3E")
        );
        tokio::fs::write(&config.log_file, body).await.unwrap();

        let alerts = monitor.poll_once().await.unwrap();
        let kinds: Vec<_> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::SqlInjection, AlertKind::Xss]);

        let entries = blacklist::read_entries(&config.blacklist_path()).await.unwrap();
        let ips: Vec<_> = entries.iter().filter_map(|e| e.ip.as_deref()).collect();
        assert_eq!(ips, vec!["6.6.6.6", "7.7.7.7"]);
    }

    #[tokio::test]
    async fn broken_blacklist_still_logs_every_alert() {
        let dir = tempfile::tempdir().unwrap();
        let (mut monitor, config) = monitor_in(dir.path(), 100).await;
        tokio::fs::remove_file(config.blacklist_path()).await.unwrap();
        tokio::fs::create_dir(config.blacklist_path()).await.unwrap();

        let now = Utc::now();
        let alerts = monitor
            .process(
                &[line("6.6.6.6", "/?q=union"), line("7.7.7.7", "/?q=select")],
                now,
            )
            .await;
        assert_eq!(alerts.len(), 2);

        let log = tokio::fs::read_to_string(config.alerts_log_path()).await.unwrap();
        assert_eq!(log.lines().count(), 2);
        assert!(log.contains("ip=7.7.7.7"));
    }

    #[tokio::test]
    async fn zero_poll_interval_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, _) = monitor_in(dir.path(), 50).await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(monitor.run(Duration::ZERO, cancel.clone()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("monitor should stop")
            .expect("monitor should not panic");
    }

    #[tokio::test]
    async fn flood_detected_across_polls() {
        let dir = tempfile::tempdir().unwrap();
        let (mut monitor, config) = monitor_in(dir.path(), 3).await;

        let mut body = String::new();
        for _ in 0..3 {
            body.push_str(&line("9.9.9.9", "/"));
            body.push('\n');
        }
        tokio::fs::write(&config.log_file, body).await.unwrap();

        let alerts = monitor.poll_once().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Flood);
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, _) = monitor_in(dir.path(), 50).await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(monitor.run(Duration::from_millis(10), cancel.clone()));
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("monitor should stop")
            .unwrap();
    }
}
