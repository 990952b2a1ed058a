//! Repository for the `employees` table (HR records).

use chrono::NaiveDate;
use sqlx::PgPool;
use trinity_core::types::DbId;

use crate::models::employee::{CreateEmployee, Employee, EmployeeAttendance, UpdateEmployee};

const COLUMNS: &str = "id, name, role, status, contact_info, user_id, created_at, updated_at";

/// Provides CRUD operations for HR employee records.
pub struct EmployeeRepo;

impl EmployeeRepo {
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (name, role, status, contact_info, user_id)
             VALUES ($1, COALESCE($2, 'Employee'), COALESCE($3, 'Active'), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.status)
            .bind(&input.contact_info)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees ORDER BY name, id");
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                status = COALESCE($4, status),
                contact_info = COALESCE($5, contact_info),
                user_id = COALESCE($6, user_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.status)
            .bind(&input.contact_info)
            .bind(input.user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("UPDATE employees SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every employee with whether their linked user marked presence on `day`.
    ///
    /// Unlinked employees are never present.
    pub async fn attendance_on(
        pool: &PgPool,
        day: NaiveDate,
    ) -> Result<Vec<EmployeeAttendance>, sqlx::Error> {
        sqlx::query_as::<_, EmployeeAttendance>(
            "SELECT e.id, e.name, e.status, e.user_id,
                    (p.id IS NOT NULL) AS present_today
             FROM employees e
             LEFT JOIN presence p ON p.user_id = e.user_id AND p.marked_on = $1
             ORDER BY e.id",
        )
        .bind(day)
        .fetch_all(pool)
        .await
    }
}
