//! Attack signature detection over access-log lines.
//!
//! [`Detector`] applies three independent rules to every line:
//!
//! 1. SQL keywords (`select`, `union`, `drop`) as whole words in the request path.
//! 2. A `<script` tag anywhere in the line or the decoded path.
//! 3. Request flooding: at least `flood_threshold` lines from one address
//!    within `flood_window`.
//!
//! The flood rule is edge-triggered: an address alerts once when its window
//! reaches the threshold and is re-armed only after the window drains below it.

use std::collections::{HashMap, VecDeque};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::access_log::{extract_ip, extract_path, percent_decode};
use crate::types::Timestamp;

static SQL_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(select|union|drop)\b").expect("valid regex"));

/// Default number of requests that constitutes a flood.
pub const DEFAULT_FLOOD_THRESHOLD: usize = 50;

/// Default flood observation window in seconds.
pub const DEFAULT_FLOOD_WINDOW_SECS: i64 = 60;

pub const REASON_SQL_INJECTION: &str = "SQL Injection Attempt Detected";
pub const REASON_XSS: &str = "XSS Attempt Detected";

/// Which rule produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    SqlInjection,
    Xss,
    Flood,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::SqlInjection => "sql_injection",
            AlertKind::Xss => "xss",
            AlertKind::Flood => "flood",
        }
    }
}

/// A single detection, in the shape persisted to the blacklist file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub time: Timestamp,
    pub reason: String,
    pub ip: Option<String>,
    pub path: Option<String>,
    pub line: String,
    pub kind: AlertKind,
}

/// Tunables for [`Detector`].
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub flood_threshold: usize,
    pub flood_window: chrono::Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            flood_threshold: DEFAULT_FLOOD_THRESHOLD,
            flood_window: chrono::Duration::seconds(DEFAULT_FLOOD_WINDOW_SECS),
        }
    }
}

#[derive(Debug, Default)]
struct AddressWindow {
    seen: VecDeque<Timestamp>,
    flooding: bool,
}

/// Stateful line inspector. One instance per monitored log.
#[derive(Debug)]
pub struct Detector {
    config: DetectorConfig,
    windows: HashMap<String, AddressWindow>,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            windows: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Number of addresses currently tracked by the flood rule.
    pub fn tracked_addresses(&self) -> usize {
        self.windows.len()
    }

    /// Inspect one log line observed at `now`, returning zero or more alerts
    /// in rule order (SQL injection, XSS, flood).
    pub fn inspect(&mut self, line: &str, now: Timestamp) -> Vec<SecurityAlert> {
        let ip = extract_ip(line);
        let path = extract_path(line);
        let decoded = path.map(percent_decode);
        let mut alerts = Vec::new();

        let alert = |kind: AlertKind, reason: String| SecurityAlert {
            time: now,
            reason,
            ip: ip.map(str::to_string),
            path: path.map(str::to_string),
            line: line.to_string(),
            kind,
        };

        if let (Some(raw), Some(decoded)) = (path, decoded.as_deref()) {
            if SQL_KEYWORD_RE.is_match(raw) || SQL_KEYWORD_RE.is_match(decoded) {
                alerts.push(alert(AlertKind::SqlInjection, REASON_SQL_INJECTION.into()));
            }
        }

        let script_in_line = line.to_lowercase().contains("<script");
        let script_in_path = decoded
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains("<script"));
        if script_in_line || script_in_path {
            alerts.push(alert(AlertKind::Xss, REASON_XSS.into()));
        }

        if let Some(addr) = ip {
            if let Some(count) = self.record_request(addr, now) {
                alerts.push(alert(
                    AlertKind::Flood,
                    format!(
                        "DoS/Flooding Attempt ({count} requests in {}s)",
                        self.config.flood_window.num_seconds()
                    ),
                ));
            }
        }

        alerts
    }

    /// Record a request from `addr`; returns the window count when the flood
    /// rule fires.
    fn record_request(&mut self, addr: &str, now: Timestamp) -> Option<usize> {
        let window = self.config.flood_window;
        let threshold = self.config.flood_threshold;
        let entry = self.windows.entry(addr.to_string()).or_default();

        entry.seen.push_back(now);
        while entry
            .seen
            .front()
            .is_some_and(|first| now - *first > window)
        {
            entry.seen.pop_front();
        }

        let count = entry.seen.len();
        if count < threshold {
            entry.flooding = false;
            return None;
        }
        if entry.flooding {
            return None;
        }
        entry.flooding = true;
        Some(count)
    }

    /// Drop addresses with no requests inside the window ending at `now`.
    pub fn prune(&mut self, now: Timestamp) {
        let window = self.config.flood_window;
        let threshold = self.config.flood_threshold;
        self.windows.retain(|_, w| {
            while w.seen.front().is_some_and(|first| now - *first > window) {
                w.seen.pop_front();
            }
            if w.seen.len() < threshold {
                w.flooding = false;
            }
            !w.seen.is_empty()
        });
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
