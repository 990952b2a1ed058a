//! Network scan vocabulary, target policy and command construction for the
//! C2 scan service.
//!
//! Only run scans against hosts you own or are explicitly authorised to
//! test. [`TargetPolicy`] restricts what the service will accept.

use std::net::IpAddr;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static HOSTNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.-]+$").expect("valid regex"));

pub const SCAN_TYPE_NMAP: &str = "nmap";
pub const SCAN_TYPE_SQLMAP: &str = "sqlmap";

pub const SCAN_STATUS_PENDING: &str = "pending";
pub const SCAN_STATUS_RUNNING: &str = "running";
pub const SCAN_STATUS_COMPLETED: &str = "completed";
pub const SCAN_STATUS_FAILED: &str = "failed";

/// Statuses from which a scan will not move again. The scan repository
/// guards its final updates with this list.
pub const TERMINAL_SCAN_STATUSES: &[&str] = &[SCAN_STATUS_COMPLETED, SCAN_STATUS_FAILED];

/// Exit status reported when a subprocess exceeds its time budget.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Supported scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    Nmap,
    Sqlmap,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Nmap => SCAN_TYPE_NMAP,
            ScanType::Sqlmap => SCAN_TYPE_SQLMAP,
        }
    }

    /// Parse a user-supplied type (trimmed, case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_lowercase().as_str() {
            SCAN_TYPE_NMAP => Ok(ScanType::Nmap),
            SCAN_TYPE_SQLMAP => Ok(ScanType::Sqlmap),
            _ => Err(CoreError::Validation(
                "type must be one of [nmap, sqlmap]".into(),
            )),
        }
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan lifecycle: `pending` -> `running` -> `completed` | `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Pending => SCAN_STATUS_PENDING,
            ScanStatus::Running => SCAN_STATUS_RUNNING,
            ScanStatus::Completed => SCAN_STATUS_COMPLETED,
            ScanStatus::Failed => SCAN_STATUS_FAILED,
        }
    }
}

impl std::str::FromStr for ScanStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SCAN_STATUS_PENDING => Ok(ScanStatus::Pending),
            SCAN_STATUS_RUNNING => Ok(ScanStatus::Running),
            SCAN_STATUS_COMPLETED => Ok(ScanStatus::Completed),
            SCAN_STATUS_FAILED => Ok(ScanStatus::Failed),
            other => Err(CoreError::Validation(format!("Unknown scan status '{other}'"))),
        }
    }
}

impl std::str::FromStr for ScanType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScanType::parse(s)
    }
}

/// Allow-lists applied to scan targets. Empty lists impose no restriction.
#[derive(Debug, Clone, Default)]
pub struct TargetPolicy {
    /// Exact target strings that may be scanned.
    pub allowed_targets: Vec<String>,
    /// Prefixes (e.g. `10.0.`) one of which the target must start with.
    pub allowed_prefixes: Vec<String>,
}

impl TargetPolicy {
    /// Build a policy from comma-separated lists, ignoring blank items.
    pub fn from_lists(targets: &str, prefixes: &str) -> Self {
        let split = |s: &str| -> Vec<String> {
            s.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        };
        Self {
            allowed_targets: split(targets),
            allowed_prefixes: split(prefixes),
        }
    }

    /// Validate a target, returning its trimmed form.
    pub fn validate<'a>(&self, target: &'a str) -> Result<&'a str, CoreError> {
        let target = target.trim();
        let rejected =
            || CoreError::Validation("target validation failed or target not allowed".into());

        if target.is_empty() {
            return Err(rejected());
        }

        let is_ip = target.parse::<IpAddr>().is_ok();
        if !is_ip && !HOSTNAME_RE.is_match(target) {
            return Err(rejected());
        }

        if !self.allowed_targets.is_empty() && !self.allowed_targets.iter().any(|t| t == target)
        {
            return Err(rejected());
        }

        if !self.allowed_prefixes.is_empty()
            && !self
                .allowed_prefixes
                .iter()
                .any(|p| target.starts_with(p.as_str()))
        {
            return Err(rejected());
        }

        Ok(target)
    }
}

/// A command line to execute without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ScanCommand {
    /// Space-joined rendering stored alongside the scan for auditing.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the scanner invocation for `target`.
///
/// `sqlmap_script` is the installed `sqlmap.py`, or `None` when sqlmap is
/// not available on this host.
pub fn build_command(
    scan_type: ScanType,
    target: &str,
    sqlmap_script: Option<&Path>,
) -> Result<ScanCommand, CoreError> {
    match scan_type {
        ScanType::Nmap => Ok(ScanCommand {
            program: "nmap".into(),
            args: vec!["-sV".into(), "-Pn".into(), target.into()],
        }),
        ScanType::Sqlmap => {
            let script = sqlmap_script.ok_or_else(|| {
                CoreError::Internal("sqlmap not available in container".into())
            })?;
            Ok(ScanCommand {
                program: "python3".into(),
                args: vec![
                    script.display().to_string(),
                    "--url".into(),
                    target.into(),
                    "--batch".into(),
                ],
            })
        }
    }
}

/// Combine captured stdout and stderr into the stored scan output.
pub fn compose_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::from(stdout);
    if !stderr.is_empty() {
        out.push_str("\n[STDERR]\n");
        out.push_str(stderr);
    }
    out
}

/// Simulated output returned in dry-run mode.
pub fn dry_run_output(command: &ScanCommand) -> String {
    format!(
        "[DRY RUN] Would run: {}\nSample result: port 80/tcp open\n",
        command.display()
    )
}
