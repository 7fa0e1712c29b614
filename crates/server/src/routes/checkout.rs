//! Checkout handlers.
//!
//! Three endpoints: open a gateway session for an online payment, verify the
//! returned payment and finalize the order, or place a cash-on-delivery
//! order directly. All pricing is computed server-side from the draft's
//! product ids and quantities.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::middleware::OptionalCustomer;
use crate::routes::ok;
use crate::services::CheckoutService;
use crate::services::checkout::CheckoutDraft;
use crate::state::AppState;

fn checkout_service(state: &AppState) -> CheckoutService<'_> {
    CheckoutService::new(
        state.pool(),
        state.gateway(),
        &state.config().gateway.currency,
    )
}

/// Open a payment-gateway session for a draft order.
///
/// # Errors
///
/// Returns 400 for an invalid draft, 409 if an item lacks stock, or a
/// gateway error.
pub async fn create_session(
    State(state): State<AppState>,
    Json(draft): Json<CheckoutDraft>,
) -> Result<Json<Value>> {
    let session = checkout_service(&state).create_gateway_session(&draft).await?;
    Ok(ok(session))
}

/// Request body for payment verification.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub draft: CheckoutDraft,
}

/// Verify a gateway payment signature and finalize the order.
///
/// # Errors
///
/// Returns 401 on a bad signature (nothing is persisted), 409 if stock ran
/// out or the payment was already recorded, or a database error.
pub async fn verify_payment(
    OptionalCustomer(customer): OptionalCustomer,
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>> {
    let order = checkout_service(&state)
        .verify_and_finalize(
            &request.gateway_order_id,
            &request.gateway_payment_id,
            &request.signature,
            &request.draft,
            customer.map(|c| c.id),
        )
        .await?;

    Ok(ok(order))
}

/// Place a cash-on-delivery order.
///
/// # Errors
///
/// Returns 400 if COD is disabled or the draft is invalid, 409 if an item
/// lacks stock, or a database error.
pub async fn place_cod_order(
    OptionalCustomer(customer): OptionalCustomer,
    State(state): State<AppState>,
    Json(draft): Json<CheckoutDraft>,
) -> Result<Json<Value>> {
    let order = checkout_service(&state)
        .place_cod_order(&draft, customer.map(|c| c.id))
        .await?;

    Ok(ok(order))
}
