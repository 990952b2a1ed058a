//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trinity_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub department_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub phone_number: Option<String>,
    pub department_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            phone_number: u.phone_number,
            department_id: u.department_id,
            status: u.status,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub department_id: Option<DbId>,
}

/// Admin-level update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub role: Option<String>,
    pub department_id: Option<DbId>,
    pub status: Option<String>,
}

/// Self-service profile update. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}
