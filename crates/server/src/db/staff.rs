//! Staff and task repository.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;

use clove_core::{Email, StaffId, StaffRole, TaskId, TaskStatus};

use super::RepositoryError;
use crate::models::{Staff, StaffTask};

const STAFF_COLUMNS: &str = "id, email, name, password_hash, role, active, created_at";

const TASK_COLUMNS: &str =
    "id, title, detail, assigned_to, created_by, status, due_date, created_at";

/// Fields for creating a task.
#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub detail: Option<String>,
    pub assigned_to: Option<StaffId>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Repository for back-office staff accounts and their tasks.
pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an active staff account by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Staff>, RepositoryError> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE email = $1 AND active");
        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;
        Ok(staff)
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
        role: StaffRole,
    ) -> Result<Staff, RepositoryError> {
        let sql = format!(
            "INSERT INTO staff (email, name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {STAFF_COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&sql)
            .bind(email.as_str())
            .bind(name)
            .bind(password_hash)
            .bind(role)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "staff email already exists"))
    }

    /// List all staff accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Staff>, RepositoryError> {
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY created_at");
        let staff = sqlx::query_as::<_, Staff>(&sql).fetch_all(self.pool).await?;
        Ok(staff)
    }

    /// Create a task.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_task(
        &self,
        created_by: StaffId,
        input: &NewTask,
    ) -> Result<StaffTask, RepositoryError> {
        let sql = format!(
            "INSERT INTO staff_tasks (title, detail, assigned_to, created_by, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, StaffTask>(&sql)
            .bind(&input.title)
            .bind(&input.detail)
            .bind(input.assigned_to)
            .bind(created_by)
            .bind(input.due_date)
            .fetch_one(self.pool)
            .await?;
        Ok(task)
    }

    /// List tasks. `assigned_to` restricts to one worker's tasks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_tasks(
        &self,
        assigned_to: Option<StaffId>,
    ) -> Result<Vec<StaffTask>, RepositoryError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM staff_tasks
             WHERE $1::integer IS NULL OR assigned_to = $1
             ORDER BY due_date NULLS LAST, created_at"
        );
        let tasks = sqlx::query_as::<_, StaffTask>(&sql)
            .bind(assigned_to)
            .fetch_all(self.pool)
            .await?;
        Ok(tasks)
    }

    /// Get a task by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_task(&self, id: TaskId) -> Result<Option<StaffTask>, RepositoryError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM staff_tasks WHERE id = $1");
        let task = sqlx::query_as::<_, StaffTask>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(task)
    }

    /// Set a task's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the task does not exist.
    pub async fn set_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<StaffTask, RepositoryError> {
        let sql = format!(
            "UPDATE staff_tasks SET status = $2 WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, StaffTask>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
