//! The Manager: counts active and absent employees and writes a warning
//! letter for each absence.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use trinity_core::attendance::{classify_status, AttendanceClass, HealthSummary};
use trinity_core::letters::{letter_file_name, warning_letter};
use trinity_db::models::employee::EmployeeAttendance;
use trinity_db::repositories::EmployeeRepo;

use crate::config::MIN_MANAGER_INTERVAL;
use crate::error::SentinelError;

/// Latest summary, shared with the HTTP surface.
pub type SharedSummary = Arc<RwLock<HealthSummary>>;

/// Summarise `rows` and write one letter per absent employee into
/// `reports_dir`. Letters for the same employee and day are overwritten.
pub async fn write_reports(
    rows: &[EmployeeAttendance],
    reports_dir: &Path,
    day: NaiveDate,
) -> Result<HealthSummary, SentinelError> {
    tokio::fs::create_dir_all(reports_dir).await?;

    let mut summary = HealthSummary::default();
    for row in rows {
        let class = classify_status(Some(&row.status));
        summary.record(class, row.present_today);

        if class == AttendanceClass::Absent {
            let path = reports_dir.join(letter_file_name(row.id, &row.name, day));
            tokio::fs::write(&path, warning_letter(&row.name, Some(row.id), day)).await?;
            tracing::info!(employee_id = row.id, path = %path.display(), "Warning letter written");
            summary.reports_generated += 1;
        }
    }
    summary.last_update = Some(Utc::now());
    Ok(summary)
}

/// One manager pass against the database for the current UTC day.
pub async fn run_once(pool: &PgPool, reports_dir: &Path) -> Result<HealthSummary, SentinelError> {
    let day = Utc::now().date_naive();
    let rows = EmployeeRepo::attendance_on(pool, day).await?;
    let summary = write_reports(&rows, reports_dir, day).await?;
    tracing::info!(
        active = summary.active,
        absent = summary.absent,
        present_today = summary.present_today,
        reports = summary.reports_generated,
        "Manager pass complete"
    );
    Ok(summary)
}

/// Run a pass immediately and then every `interval` (at least one second)
/// until `cancel` fires, publishing each summary into `shared`. Failed
/// passes are logged and leave the previous summary in place.
pub async fn run_periodic(
    pool: PgPool,
    reports_dir: std::path::PathBuf,
    interval: Duration,
    shared: SharedSummary,
    cancel: CancellationToken,
) {
    let interval = interval.max(MIN_MANAGER_INTERVAL);
    tracing::info!(interval_secs = interval.as_secs(), "Manager loop started");
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Manager loop stopping");
                break;
            }
            _ = ticker.tick() => {
                match run_once(&pool, &reports_dir).await {
                    Ok(summary) => *shared.write().await = summary,
                    Err(e) => tracing::error!(error = %e, "Manager pass failed"),
                }
            }
        }
    }
}
