//! Background execution of persisted scans.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use trinity_core::scan::{
    build_command, compose_output, dry_run_output, ScanStatus, ScanType, TIMEOUT_EXIT_CODE,
};
use trinity_core::types::DbId;
use trinity_db::repositories::ScanRepo;

use crate::config::RunnerConfig;
use crate::error::ScanError;
use crate::process::{run_command, CommandOutput};

/// Output stored on scans abandoned by a previous process.
pub const INTERRUPTED_OUTPUT: &str = "Interrupted by restart";

/// Output stored when the runner itself fails unexpectedly.
pub const INTERNAL_ERROR_OUTPUT: &str = "Internal worker error";

/// Final state recorded for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub status: ScanStatus,
    pub output: String,
}

impl ScanOutcome {
    fn failed(output: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Failed,
            output: output.into(),
        }
    }
}

/// Map a subprocess result onto the stored scan outcome.
pub fn outcome_for(result: Result<CommandOutput, ScanError>) -> ScanOutcome {
    match result {
        Ok(out) if out.exit_code == 0 => ScanOutcome {
            status: ScanStatus::Completed,
            output: compose_output(&out.stdout, &out.stderr),
        },
        Ok(out) if out.exit_code == TIMEOUT_EXIT_CODE => ScanOutcome::failed("Scan timed out"),
        Ok(out) => {
            let output = compose_output(&out.stdout, &out.stderr);
            if output.trim().is_empty() {
                ScanOutcome::failed(format!("Exit code {}", out.exit_code))
            } else {
                ScanOutcome::failed(output)
            }
        }
        Err(ScanError::Timeout) => ScanOutcome::failed("Scan timed out"),
        Err(e @ ScanError::ToolMissing { .. }) => ScanOutcome::failed(e.to_string()),
        Err(ScanError::Core(e)) => ScanOutcome::failed(core_message(&e)),
        Err(e) => {
            tracing::error!(error = %e, "Scan execution error");
            ScanOutcome::failed(INTERNAL_ERROR_OUTPUT)
        }
    }
}

fn core_message(e: &trinity_core::error::CoreError) -> String {
    use trinity_core::error::CoreError;
    match e {
        CoreError::Validation(msg) | CoreError::Internal(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Executes scans on background tasks, at most `max_concurrent` at a time.
#[derive(Clone)]
pub struct ScanRunner {
    pool: PgPool,
    config: Arc<RunnerConfig>,
    permits: Arc<Semaphore>,
}

impl ScanRunner {
    pub fn new(pool: PgPool, config: RunnerConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent));
        Self {
            pool,
            config: Arc::new(config),
            permits,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Start executing a pending scan. Returns immediately.
    ///
    /// The scan stays `pending` until a concurrency slot frees up.
    pub fn submit(&self, scan_id: DbId, target: String, scan_type: ScanType) -> JoinHandle<()> {
        let runner = self.clone();
        tokio::spawn(async move {
            if let Err(e) = runner.run(scan_id, &target, scan_type).await {
                tracing::error!(scan_id, error = %e, "Scan runner failed");
                if let Err(e) = ScanRepo::finish(
                    &runner.pool,
                    scan_id,
                    ScanStatus::Failed,
                    INTERNAL_ERROR_OUTPUT,
                )
                .await
                {
                    tracing::error!(scan_id, error = %e, "Failed to record scan failure");
                }
            }
        })
    }

    async fn run(&self, scan_id: DbId, target: &str, scan_type: ScanType) -> Result<(), ScanError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ScanError::Core(trinity_core::error::CoreError::Internal(e.to_string())))?;

        let command = match build_command(scan_type, target, self.config.sqlmap_script()) {
            Ok(command) => command,
            Err(e) => {
                let outcome = outcome_for(Err(e.into()));
                tracing::warn!(scan_id, output = %outcome.output, "Scan rejected before start");
                return self.record(scan_id, &outcome).await;
            }
        };

        let command_line = command.display();
        if !ScanRepo::mark_running(&self.pool, scan_id, &command_line).await? {
            tracing::warn!(scan_id, "Scan no longer pending, skipping");
            return Ok(());
        }
        tracing::info!(scan_id, command = %command_line, dry_run = self.config.dry_run, "Scan started");

        let outcome = if self.config.dry_run {
            ScanOutcome {
                status: ScanStatus::Completed,
                output: dry_run_output(&command),
            }
        } else {
            outcome_for(run_command(&command, self.config.max_scan_time).await)
        };

        self.record(scan_id, &outcome).await
    }

    async fn record(&self, scan_id: DbId, outcome: &ScanOutcome) -> Result<(), ScanError> {
        if ScanRepo::finish(&self.pool, scan_id, outcome.status, &outcome.output).await? {
            tracing::info!(scan_id, status = outcome.status.as_str(), "Scan finished");
        } else {
            tracing::warn!(scan_id, "Scan already finished, result discarded");
        }
        Ok(())
    }

    /// Fail scans left `pending` or `running` by a previous process.
    pub async fn fail_orphaned(&self) -> Result<u64, ScanError> {
        let count = ScanRepo::fail_unfinished(&self.pool, INTERRUPTED_OUTPUT).await?;
        if count > 0 {
            tracing::warn!(count, "Marked orphaned scans as failed");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use trinity_core::error::CoreError;

    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    #[test]
    fn success_keeps_both_streams() {
        let outcome = outcome_for(Ok(output("80/tcp open", "warn", 0)));
        assert_eq!(outcome.status, ScanStatus::Completed);
        assert_eq!(outcome.output, "80/tcp open\n[STDERR]\nwarn");
    }

    #[test]
    fn non_zero_exit_without_output() {
        let outcome = outcome_for(Ok(output("", "", 2)));
        assert_eq!(outcome, ScanOutcome::failed("Exit code 2"));
    }

    #[test]
    fn non_zero_exit_with_output() {
        let outcome = outcome_for(Ok(output("", "boom", 1)));
        assert_eq!(outcome.status, ScanStatus::Failed);
        assert!(outcome.output.contains("boom"));
    }

    #[test]
    fn timeouts() {
        assert_eq!(outcome_for(Err(ScanError::Timeout)).output, "Scan timed out");
        assert_eq!(
            outcome_for(Ok(output("partial", "", TIMEOUT_EXIT_CODE))).output,
            "Scan timed out"
        );
    }

    #[test]
    fn missing_tool_is_explained() {
        let outcome = outcome_for(Err(ScanError::ToolMissing {
            program: "nmap".into(),
        }));
        assert_eq!(outcome.output, "nmap is not installed");
    }

    #[test]
    fn sqlmap_unavailable_message() {
        let err = CoreError::Internal("sqlmap not available in container".into());
        assert_eq!(
            outcome_for(Err(err.into())).output,
            "sqlmap not available in container"
        );
    }

    #[test]
    fn io_errors_are_sanitised() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "pipe exploded");
        assert_eq!(outcome_for(Err(err.into())).output, INTERNAL_ERROR_OUTPUT);
    }
}
