//! Back-office order handlers.
//!
//! Workers handle day-to-day fulfillment (listing orders, advancing status
//! along the forward chain); cancellation is admin-tier, and the manual
//! refund workflow is superuser-only.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use clove_core::{OrderId, OrderStatus, RefundStatus};

use crate::db::{OrderFilter, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireSuperuser, RequireWorker};
use crate::routes::ok;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct AdminOrderQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<clove_core::PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List orders with optional status filters.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
    Query(query): Query<AdminOrderQuery>,
) -> Result<Json<Value>> {
    let filter = OrderFilter {
        status: query.status,
        payment_status: query.payment_status,
        limit: query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let orders = OrderRepository::new(state.pool()).list(filter).await?;
    Ok(ok(orders))
}

/// Get one order with its line items.
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn get(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.items_for(id).await?;

    Ok(ok(serde_json::json!({
        "order": order,
        "items": items,
    })))
}

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Advance an order's status along the forward chain.
///
/// Cancellation does not go through here; it has its own endpoint so that
/// restocking and the refund workflow always run with it.
///
/// # Errors
///
/// Returns 409 for an illegal transition, 404 for a missing order.
pub async fn set_status(
    RequireWorker(staff): RequireWorker,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Value>> {
    if request.status == OrderStatus::Cancelled {
        return Err(AppError::BadRequest(
            "use the cancel endpoint to cancel an order".to_string(),
        ));
    }

    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_transition_to(request.status) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {:?} to {:?}",
            order.status, request.status
        )));
    }

    let updated = repo.set_status(id, request.status).await?;

    tracing::info!(
        order_number = %updated.order_number,
        status = ?updated.status,
        staff = %staff.email,
        "order status updated"
    );

    Ok(ok(updated))
}

/// Cancel an order from the back office.
///
/// # Errors
///
/// Returns 409 if the order can no longer be cancelled, 404 if missing.
pub async fn cancel(
    RequireAdmin(staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_cancel() {
        return Err(AppError::Conflict(
            "order can no longer be cancelled".to_string(),
        ));
    }

    let cancelled = repo.cancel(id).await?;

    tracing::info!(
        order_number = %cancelled.order_number,
        staff = %staff.email,
        "order cancelled by staff"
    );

    Ok(ok(cancelled))
}

/// Request body for a refund-workflow update.
#[derive(Debug, Deserialize)]
pub struct RefundUpdateRequest {
    pub refund_status: RefundStatus,
}

/// Advance the manual refund workflow on a cancelled online order.
///
/// Recording `completed` also flips the order's payment status to refunded.
///
/// # Errors
///
/// Returns 409 if the order is not refundable or the step is out of order,
/// 404 if the order does not exist.
pub async fn update_refund(
    RequireSuperuser(staff): RequireSuperuser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<RefundUpdateRequest>,
) -> Result<Json<Value>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.refund_allowed() {
        return Err(AppError::Conflict(
            "refunds apply only to cancelled online orders".to_string(),
        ));
    }

    let current = order.refund_status.ok_or_else(|| {
        AppError::Conflict("no refund workflow started for this order".to_string())
    })?;

    if !current.can_advance_to(request.refund_status) {
        return Err(AppError::Conflict(format!(
            "cannot move refund from {current:?} to {:?}",
            request.refund_status
        )));
    }

    let updated = repo.set_refund_status(id, request.refund_status).await?;

    tracing::info!(
        order_number = %updated.order_number,
        refund_status = ?updated.refund_status,
        staff = %staff.email,
        "refund workflow updated"
    );

    Ok(ok(updated))
}
