//! HR employee record model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub status: String,
    pub contact_info: Option<String>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub role: Option<String>,
    pub status: Option<String>,
    pub contact_info: Option<String>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub contact_info: Option<String>,
    pub user_id: Option<DbId>,
}

/// An employee as seen by the absence manager: the HR record plus whether
/// its linked user has a presence mark for the day.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeAttendance {
    pub id: DbId,
    pub name: String,
    pub status: String,
    pub user_id: Option<DbId>,
    pub present_today: bool,
}
