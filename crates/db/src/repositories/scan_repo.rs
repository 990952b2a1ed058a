//! Repository for the `scans` table.

use sqlx::PgPool;
use trinity_core::scan::{
    ScanStatus, SCAN_STATUS_FAILED, SCAN_STATUS_PENDING, SCAN_STATUS_RUNNING,
    TERMINAL_SCAN_STATUSES,
};
use trinity_core::types::DbId;
use uuid::Uuid;

use crate::models::scan::{CreateScan, Scan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, scan_uuid, target, scan_type, command, status, output, \
                        requested_by, created_at, updated_at";

/// Provides persistence for C2 scan jobs.
pub struct ScanRepo;

impl ScanRepo {
    /// Insert a new scan in `pending` state.
    pub async fn create(pool: &PgPool, input: &CreateScan) -> Result<Scan, sqlx::Error> {
        let query = format!(
            "INSERT INTO scans (target, scan_type, requested_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scan>(&query)
            .bind(&input.target)
            .bind(&input.scan_type)
            .bind(input.requested_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scans WHERE id = $1");
        sqlx::query_as::<_, Scan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scan by its external identifier.
    pub async fn find_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Scan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scans WHERE scan_uuid = $1");
        sqlx::query_as::<_, Scan>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Most recent scans first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Scan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scans ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Scan>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Move a pending scan to `running`, recording the command line.
    ///
    /// Returns `false` if the scan was not pending.
    pub async fn mark_running(pool: &PgPool, id: DbId, command: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scans SET status = $2, command = $3 WHERE id = $1 AND status = $4",
        )
        .bind(id)
        .bind(SCAN_STATUS_RUNNING)
        .bind(command)
        .bind(SCAN_STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the final status and output of a scan.
    ///
    /// Returns `false` without touching the row if the scan already reached
    /// a terminal status, so a late result never overwrites an earlier one.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        status: ScanStatus,
        output: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scans SET status = $2, output = $3 WHERE id = $1 AND status <> ALL($4)",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(output)
        .bind(TERMINAL_SCAN_STATUSES)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail every scan not yet in a terminal status. Returns the number of rows touched.
    pub async fn fail_unfinished(pool: &PgPool, output: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scans SET status = $1, output = $2 WHERE status <> ALL($3)",
        )
        .bind(SCAN_STATUS_FAILED)
        .bind(output)
        .bind(TERMINAL_SCAN_STATUSES)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
