//! Back-office staff and task models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clove_core::{StaffId, StaffRole, TaskId, TaskStatus};

/// Session storage keys shared by the auth extractors and login handlers.
pub mod session_keys {
    /// Key holding the [`CurrentStaff`](super::CurrentStaff) value.
    pub const CURRENT_STAFF: &str = "current_staff";
    /// Key holding the [`CurrentCustomer`](crate::models::CurrentCustomer) value.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}

/// A back-office staff account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Staff {
    pub id: StaffId,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: StaffRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// The staff identity stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    pub id: StaffId,
    pub email: String,
    pub name: String,
    pub role: StaffRole,
}

impl From<&Staff> for CurrentStaff {
    fn from(staff: &Staff) -> Self {
        Self {
            id: staff.id,
            email: staff.email.clone(),
            name: staff.name.clone(),
            role: staff.role,
        }
    }
}

/// A task assigned to a worker.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffTask {
    pub id: TaskId,
    pub title: String,
    pub detail: Option<String>,
    pub assigned_to: Option<StaffId>,
    pub created_by: StaffId,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
