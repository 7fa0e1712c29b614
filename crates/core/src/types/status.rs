//! Order, payment, refund, and staff-role state enums.
//!
//! The transition rules here are the contract the server enforces:
//! cancellation is only legal from the four pre-delivery states, and the
//! refund workflow is a manual two-step gated on online payment + cancelled
//! order.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Packing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether an order in this status may still be cancelled.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Confirmed | Self::Processing | Self::Packing
        )
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Forward progress only: pending → confirmed → processing → packing →
    /// delivered, plus cancellation from any pre-delivery state. Delivered
    /// and cancelled are terminal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Processing)
                | (Self::Processing, Self::Packing)
                | (Self::Packing, Self::Delivered)
        ) || (self.can_cancel() && matches!(next, Self::Cancelled))
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// Online payment through the gateway.
    Online,
}

/// Manual refund workflow marker, distinct from [`PaymentStatus`].
///
/// Set to `Started` when a paid online order is cancelled; advanced by an
/// admin. `Completed` is the only state that flips the order's payment
/// status to refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "refund_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Started,
    Processing,
    Completed,
    Failed,
}

impl RefundStatus {
    /// Whether the workflow may advance from `self` to `next`.
    ///
    /// Started → processing → completed or failed; a failed refund may be
    /// retried from processing. Completed is terminal.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Started, Self::Processing)
                | (Self::Processing, Self::Completed | Self::Failed)
                | (Self::Failed, Self::Processing)
        )
    }
}

/// Back-office staff role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "staff_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access, including product creation, staff/task management,
    /// and refund handling.
    Superuser,
    /// Store management: categories, reviews, customers, settings, offers.
    Admin,
    /// Order fulfillment: viewing orders, advancing order status, own tasks.
    Worker,
}

impl StaffRole {
    /// Whether this role satisfies a requirement for `required`.
    ///
    /// The hierarchy is strict: superuser ⊃ admin ⊃ worker.
    #[must_use]
    pub const fn grants(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Worker => 0,
            Self::Admin => 1,
            Self::Superuser => 2,
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Superuser => write!(f, "superuser"),
            Self::Admin => write!(f, "admin"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superuser" => Ok(Self::Superuser),
            "admin" => Ok(Self::Admin),
            "worker" => Ok(Self::Worker),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}

/// Status of a back-office task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "task_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_can_cancel_exactly_pre_delivery_states() {
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Confirmed.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(OrderStatus::Packing.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
        assert!(!OrderStatus::Cancelled.can_cancel());
    }

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Packing));
        assert!(OrderStatus::Packing.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_or_regressing() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Packing));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_terminal_states() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Packing,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_cancel_transition_mirrors_can_cancel() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Packing,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_refund_workflow_progression() {
        use RefundStatus::{Completed, Failed, Processing, Started};
        assert!(Started.can_advance_to(Processing));
        assert!(Processing.can_advance_to(Completed));
        assert!(Processing.can_advance_to(Failed));
        assert!(Failed.can_advance_to(Processing));

        assert!(!Started.can_advance_to(Completed));
        assert!(!Started.can_advance_to(Failed));
        for next in [Started, Processing, Completed, Failed] {
            assert!(!Completed.can_advance_to(next));
        }
    }

    #[test]
    fn test_role_hierarchy() {
        use StaffRole::{Admin, Superuser, Worker};
        assert!(Superuser.grants(Superuser));
        assert!(Superuser.grants(Admin));
        assert!(Superuser.grants(Worker));
        assert!(Admin.grants(Admin));
        assert!(Admin.grants(Worker));
        assert!(!Admin.grants(Superuser));
        assert!(Worker.grants(Worker));
        assert!(!Worker.grants(Admin));
        assert!(!Worker.grants(Superuser));
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [StaffRole::Superuser, StaffRole::Admin, StaffRole::Worker] {
            assert_eq!(StaffRole::from_str(&role.to_string()), Ok(role));
        }
        assert!(StaffRole::from_str("root").is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Packing).expect("serialize"),
            "\"packing\""
        );
        assert_eq!(
            serde_json::to_string(&RefundStatus::Started).expect("serialize"),
            "\"started\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).expect("serialize"),
            "\"cod\""
        );
    }
}
