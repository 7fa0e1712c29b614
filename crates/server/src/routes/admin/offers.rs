//! Back-office offer management. Admin tier.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use clove_core::OfferId;

use crate::db::{OfferInput, OfferRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::ok;
use crate::state::AppState;

fn validate_discount(input: &OfferInput) -> Result<()> {
    // Exactly one discount kind; the table check would reject it anyway,
    // but this gives the client a readable message.
    if input.percent_off.is_some() == input.amount_off.is_some() {
        return Err(AppError::BadRequest(
            "exactly one of percent_off / amount_off must be set".to_string(),
        ));
    }
    Ok(())
}

/// List all offers, active or not.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let offers = OfferRepository::new(state.pool()).list(false).await?;
    Ok(ok(offers))
}

/// Create an offer.
///
/// # Errors
///
/// Returns 400 for an invalid discount shape, 409 if the code is taken.
pub async fn create(
    RequireAdmin(staff): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<OfferInput>,
) -> Result<Json<Value>> {
    validate_discount(&input)?;

    let offer = OfferRepository::new(state.pool()).create(&input).await?;

    state.cache().invalidate_offers();
    tracing::info!(code = %offer.code, staff = %staff.email, "offer created");

    Ok(ok(offer))
}

/// Replace an offer's fields. The redemption counter is preserved.
///
/// # Errors
///
/// Returns 404 if the offer does not exist, 409 on a code clash.
pub async fn update(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OfferId>,
    Json(input): Json<OfferInput>,
) -> Result<Json<Value>> {
    validate_discount(&input)?;

    let offer = OfferRepository::new(state.pool()).update(id, &input).await?;

    state.cache().invalidate_offers();

    Ok(ok(offer))
}

/// Delete an offer.
///
/// # Errors
///
/// Returns 404 if the offer does not exist.
pub async fn delete(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OfferId>,
) -> Result<Json<Value>> {
    OfferRepository::new(state.pool()).delete(id).await?;

    state.cache().invalidate_offers();

    Ok(ok(serde_json::json!({})))
}
