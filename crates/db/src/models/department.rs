use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    pub manager_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub manager_id: Option<DbId>,
}
