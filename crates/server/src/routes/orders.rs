//! Customer-facing order handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalCustomer, RequireCustomer};
use crate::models::Order;
use crate::routes::ok;
use crate::state::AppState;

/// List the logged-in customer's orders, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_own(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(customer.id)
        .await?;
    Ok(ok(orders))
}

/// Query parameters for guest order lookup.
#[derive(Debug, Default, Deserialize)]
pub struct OrderLookupQuery {
    /// The email the order was placed under; required for guests.
    pub email: Option<String>,
}

async fn load_accessible_order(
    state: &AppState,
    number: &str,
    customer_id: Option<clove_core::CustomerId>,
    guest_email: Option<&str>,
) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .get_by_number(number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order '{number}'")))?;

    // A logged-in customer sees their own orders; a guest must present the
    // order email. Failures look identical to a missing order.
    let accessible = match (customer_id, guest_email) {
        (Some(id), _) => order.customer_id == Some(id),
        (None, Some(email)) => order.email.eq_ignore_ascii_case(email),
        (None, None) => false,
    };
    if !accessible {
        return Err(AppError::NotFound(format!("order '{number}'")));
    }

    Ok(order)
}

/// Get one order with its line items, by public order number.
///
/// # Errors
///
/// Returns 404 if the order does not exist or the caller cannot see it.
pub async fn get(
    OptionalCustomer(customer): OptionalCustomer,
    State(state): State<AppState>,
    Path(number): Path<String>,
    Query(query): Query<OrderLookupQuery>,
) -> Result<Json<Value>> {
    let order = load_accessible_order(
        &state,
        &number,
        customer.map(|c| c.id),
        query.email.as_deref(),
    )
    .await?;

    let items = OrderRepository::new(state.pool()).items_for(order.id).await?;

    Ok(ok(serde_json::json!({
        "order": order,
        "items": items,
    })))
}

/// Cancel an order.
///
/// Allowed while the order is still pre-delivery (pending through packing).
/// Cancellation restocks the line items; a captured online payment starts
/// the refund workflow.
///
/// # Errors
///
/// Returns 404 if the order is invisible to the caller, or 409 if it can no
/// longer be cancelled.
pub async fn cancel(
    OptionalCustomer(customer): OptionalCustomer,
    State(state): State<AppState>,
    Path(number): Path<String>,
    Query(query): Query<OrderLookupQuery>,
) -> Result<Json<Value>> {
    let order = load_accessible_order(
        &state,
        &number,
        customer.map(|c| c.id),
        query.email.as_deref(),
    )
    .await?;

    if !order.status.can_cancel() {
        return Err(AppError::Conflict(
            "order can no longer be cancelled".to_string(),
        ));
    }

    let cancelled = OrderRepository::new(state.pool()).cancel(order.id).await?;

    tracing::info!(order_number = %cancelled.order_number, "order cancelled by customer");

    Ok(ok(cancelled))
}
