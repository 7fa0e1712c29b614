//! Account handlers: saved addresses.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use clove_core::AddressId;

use crate::db::{AddressInput, CustomerRepository};
use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::routes::ok;
use crate::state::AppState;

/// List the customer's saved addresses, default first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_addresses(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let addresses = CustomerRepository::new(state.pool())
        .list_addresses(customer.id)
        .await?;
    Ok(ok(addresses))
}

/// Save a new address. Marking it default clears the previous default.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_address(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Value>> {
    let address = CustomerRepository::new(state.pool())
        .create_address(customer.id, &input)
        .await?;
    Ok(ok(address))
}

/// Delete one of the customer's addresses.
///
/// # Errors
///
/// Returns 404 if the address does not exist or belongs to someone else.
pub async fn delete_address(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Path(address_id): Path<AddressId>,
) -> Result<Json<Value>> {
    CustomerRepository::new(state.pool())
        .delete_address(customer.id, address_id)
        .await?;
    Ok(ok(serde_json::json!({})))
}
