//! Back-office staff and task handlers.
//!
//! Staff accounts and task creation are superuser-only. Workers see only
//! the tasks assigned to them and may update the status of those; admins
//! and superusers see and update everything.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::Value;

use clove_core::{Email, StaffRole, TaskId, TaskStatus};

use crate::db::{NewTask, StaffRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireSuperuser, RequireWorker};
use crate::routes::ok;
use crate::services::auth::{hash_password, validate_password};
use crate::state::AppState;

/// Request body for creating a staff account.
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: StaffRole,
}

/// Create a staff account.
///
/// # Errors
///
/// Returns 400 for an invalid email or weak password, 409 if the email is
/// taken.
pub async fn create(
    RequireSuperuser(creator): RequireSuperuser,
    State(state): State<AppState>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<Value>> {
    let email = Email::parse(&request.email).map_err(crate::services::AuthError::from)?;
    validate_password(&request.password)?;
    let password_hash = hash_password(&request.password)?;

    let staff = StaffRepository::new(state.pool())
        .create(&email, &request.name, &password_hash, request.role)
        .await?;

    tracing::info!(
        staff = %staff.email,
        role = %staff.role,
        created_by = %creator.email,
        "staff account created"
    );

    Ok(ok(staff))
}

/// List all staff accounts.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let staff = StaffRepository::new(state.pool()).list().await?;
    Ok(ok(staff))
}

/// Create a task.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_task(
    RequireSuperuser(creator): RequireSuperuser,
    State(state): State<AppState>,
    Json(input): Json<NewTask>,
) -> Result<Json<Value>> {
    let task = StaffRepository::new(state.pool())
        .create_task(creator.id, &input)
        .await?;
    Ok(ok(task))
}

/// List tasks. Workers see only their own; admins and superusers see all.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_tasks(
    RequireWorker(staff): RequireWorker,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let assigned_to = if staff.role.grants(StaffRole::Admin) {
        None
    } else {
        Some(staff.id)
    };

    let tasks = StaffRepository::new(state.pool())
        .list_tasks(assigned_to)
        .await?;
    Ok(ok(tasks))
}

/// Request body for a task status update.
#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: TaskStatus,
}

/// Update a task's status. Allowed for the assignee or any admin.
///
/// # Errors
///
/// Returns 403 if the caller is neither the assignee nor an admin, 404 if
/// the task does not exist.
pub async fn set_task_status(
    RequireWorker(staff): RequireWorker,
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(request): Json<TaskStatusRequest>,
) -> Result<Json<Value>> {
    let repo = StaffRepository::new(state.pool());

    let task = repo
        .get_task(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {id}")))?;

    let is_assignee = task.assigned_to == Some(staff.id);
    if !is_assignee && !staff.role.grants(StaffRole::Admin) {
        return Err(AppError::Forbidden(
            "only the assignee or an admin may update this task".to_string(),
        ));
    }

    let updated = repo.set_task_status(id, request.status).await?;
    Ok(ok(updated))
}
