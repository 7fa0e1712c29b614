//! Back-office customer handlers. Admin tier, read-only.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use clove_core::CustomerId;

use crate::db::{CustomerRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::ok;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the customer list.
#[derive(Debug, Default, Deserialize)]
pub struct AdminCustomerQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List customer accounts, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminCustomerQuery>,
) -> Result<Json<Value>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let customers = CustomerRepository::new(state.pool())
        .list(limit, offset)
        .await?;
    Ok(ok(customers))
}

/// Get one customer with their order history.
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn get(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Value>> {
    let customer = CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_customer(id)
        .await?;

    Ok(ok(serde_json::json!({
        "customer": customer,
        "orders": orders,
    })))
}
