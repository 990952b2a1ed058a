//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    pub creator_id: Option<DbId>,
    pub assignees: Vec<DbId>,
    pub proof_file: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_assigned_to(&self, user_id: DbId) -> bool {
        self.assignees.contains(&user_id)
    }
}

/// DTO for creating a task. `status` and `priority` fall back to the column defaults.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub assignees: Vec<DbId>,
}

/// Partial task update. `assignees`, when present, replaces the whole list.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<Timestamp>,
    pub assignees: Option<Vec<DbId>>,
    pub proof_file: Option<String>,
}

/// Filters for listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub assignee: Option<DbId>,
}
