//! Back-office site settings and carousel management. Admin tier.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use clove_core::SlideId;

use crate::db::{CatalogRepository, SettingsRepository, SettingsUpdate, SlideInput};
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireWorker};
use crate::routes::ok;
use crate::state::AppState;

/// Fetch the store-wide settings row.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_settings(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let settings = SettingsRepository::new(state.pool()).get().await?;
    Ok(ok(settings))
}

/// Apply a partial update to the settings row.
///
/// # Errors
///
/// Returns a database error if the update fails.
pub async fn update_settings(
    RequireAdmin(staff): RequireAdmin,
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Value>> {
    let settings = SettingsRepository::new(state.pool()).update(&update).await?;

    tracing::info!(staff = %staff.email, "site settings updated");

    Ok(ok(settings))
}

/// List all carousel slides, including inactive ones.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_slides(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let slides = CatalogRepository::new(state.pool()).list_slides(false).await?;
    Ok(ok(slides))
}

/// Create a carousel slide.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_slide(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SlideInput>,
) -> Result<Json<Value>> {
    let slide = CatalogRepository::new(state.pool()).create_slide(&input).await?;

    state.cache().invalidate_carousel();

    Ok(ok(slide))
}

/// Replace a carousel slide's fields.
///
/// # Errors
///
/// Returns 404 if the slide does not exist.
pub async fn update_slide(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SlideId>,
    Json(input): Json<SlideInput>,
) -> Result<Json<Value>> {
    let slide = CatalogRepository::new(state.pool())
        .update_slide(id, &input)
        .await?;

    state.cache().invalidate_carousel();

    Ok(ok(slide))
}

/// Delete a carousel slide.
///
/// # Errors
///
/// Returns 404 if the slide does not exist.
pub async fn delete_slide(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<SlideId>,
) -> Result<Json<Value>> {
    CatalogRepository::new(state.pool()).delete_slide(id).await?;

    state.cache().invalidate_carousel();

    Ok(ok(serde_json::json!({})))
}
