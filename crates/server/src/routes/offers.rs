//! Public offer handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::db::OfferRepository;
use crate::error::{AppError, Result};
use crate::routes::ok;
use crate::state::AppState;

/// List active, unexpired offers (cached).
///
/// # Errors
///
/// Returns an error if the cache loader's database query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>> {
    let offers = state.cache().offers(state.pool()).await?;
    Ok(ok(&*offers))
}

/// Request body for offer validation.
#[derive(Debug, Deserialize)]
pub struct ValidateOfferRequest {
    pub code: String,
    pub subtotal: Decimal,
}

/// Validate an offer code against a cart subtotal and quote the discount.
///
/// This is a preview for the cart page; checkout re-validates server-side,
/// so a stale quote can never change what an order is charged.
///
/// # Errors
///
/// Returns 400 with the rejection reason if the code cannot be applied,
/// or 404 if the code does not exist.
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateOfferRequest>,
) -> Result<Json<Value>> {
    let offer = OfferRepository::new(state.pool())
        .get_by_code(&request.code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("offer '{}'", request.code)))?;

    offer
        .check_redeemable(request.subtotal, chrono::Utc::now())
        .map_err(|rejection| AppError::BadRequest(rejection.to_string()))?;

    let discount = offer.discount_for(request.subtotal);

    Ok(ok(serde_json::json!({
        "code": offer.code,
        "discount": discount,
    })))
}
