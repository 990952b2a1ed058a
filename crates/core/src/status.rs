//! Status and priority vocabularies for users, tasks and HR employee records.
//!
//! Values are stored as text in the database; the check constraints in the
//! migrations mirror the lists below.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// User status
// ---------------------------------------------------------------------------

pub const USER_STATUS_ACTIVE: &str = "Active";
pub const USER_STATUS_ABSENT: &str = "Absent";
pub const USER_STATUS_ON_LEAVE: &str = "On Leave";

/// All valid user status values.
pub const VALID_USER_STATUSES: &[&str] =
    &[USER_STATUS_ACTIVE, USER_STATUS_ABSENT, USER_STATUS_ON_LEAVE];

// ---------------------------------------------------------------------------
// Task status / priority
// ---------------------------------------------------------------------------

pub const TASK_STATUS_TODO: &str = "Todo";
pub const TASK_STATUS_IN_PROGRESS: &str = "In Progress";
pub const TASK_STATUS_DONE: &str = "Done";
pub const TASK_STATUS_PENDING: &str = "Pending";
pub const TASK_STATUS_COMPLETED: &str = "Completed";

/// All valid task status values.
pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_STATUS_TODO,
    TASK_STATUS_IN_PROGRESS,
    TASK_STATUS_DONE,
    TASK_STATUS_PENDING,
    TASK_STATUS_COMPLETED,
];

pub const TASK_PRIORITY_LOW: &str = "Low";
pub const TASK_PRIORITY_MEDIUM: &str = "Medium";
pub const TASK_PRIORITY_HIGH: &str = "High";

/// All valid task priority values.
pub const VALID_TASK_PRIORITIES: &[&str] =
    &[TASK_PRIORITY_LOW, TASK_PRIORITY_MEDIUM, TASK_PRIORITY_HIGH];

/// Maximum length of a task title.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

// ---------------------------------------------------------------------------
// HR employee records
// ---------------------------------------------------------------------------

pub const EMPLOYEE_ROLE_CHEF: &str = "Chef";
pub const EMPLOYEE_ROLE_EMPLOYEE: &str = "Employee";

/// All valid HR employee role values.
pub const VALID_EMPLOYEE_ROLES: &[&str] = &[EMPLOYEE_ROLE_CHEF, EMPLOYEE_ROLE_EMPLOYEE];

pub const EMPLOYEE_STATUS_ACTIVE: &str = "Active";
pub const EMPLOYEE_STATUS_ABSENT: &str = "Absent";

/// All valid HR employee status values.
pub const VALID_EMPLOYEE_STATUSES: &[&str] = &[EMPLOYEE_STATUS_ACTIVE, EMPLOYEE_STATUS_ABSENT];

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Maximum length of a chat message.
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_one_of(kind: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

pub fn validate_user_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("user status", status, VALID_USER_STATUSES)
}

pub fn validate_task_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("task status", status, VALID_TASK_STATUSES)
}

pub fn validate_task_priority(priority: &str) -> Result<(), CoreError> {
    validate_one_of("task priority", priority, VALID_TASK_PRIORITIES)
}

pub fn validate_employee_role(role: &str) -> Result<(), CoreError> {
    validate_one_of("employee role", role, VALID_EMPLOYEE_ROLES)
}

pub fn validate_employee_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("employee status", status, VALID_EMPLOYEE_STATUSES)
}

/// Validate a task title: non-blank and at most [`MAX_TASK_TITLE_LENGTH`] characters.
pub fn validate_task_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Task title must not be empty".into()));
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Task title exceeds maximum length of {MAX_TASK_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate chat message content: non-blank and at most [`MAX_MESSAGE_LENGTH`] characters.
pub fn validate_message_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Message must not be empty".into()));
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}
