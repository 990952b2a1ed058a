//! C2 scan job model.

use serde::Serialize;
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// A row from the `scans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scan {
    #[serde(skip)]
    pub id: DbId,
    #[serde(rename = "scan_id")]
    pub scan_uuid: Uuid,
    pub target: String,
    #[serde(rename = "type")]
    pub scan_type: String,
    pub command: String,
    pub status: String,
    pub output: String,
    pub requested_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for enqueueing a scan.
#[derive(Debug)]
pub struct CreateScan {
    pub target: String,
    pub scan_type: String,
    pub requested_by: Option<DbId>,
}
