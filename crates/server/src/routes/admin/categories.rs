//! Back-office category handlers. Admin tier.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use clove_core::CategoryId;

use crate::db::{CatalogRepository, CategoryInput};
use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireWorker};
use crate::routes::ok;
use crate::state::AppState;

/// List all categories.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let categories = CatalogRepository::new(state.pool()).list_categories().await?;
    Ok(ok(categories))
}

/// Create a category.
///
/// # Errors
///
/// Returns 400 for a malformed slug, 409 if the slug is taken.
pub async fn create(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CategoryInput>,
) -> Result<Json<Value>> {
    input.slug = super::resolve_slug(&input.slug, &input.name)?.to_string();

    let category = CatalogRepository::new(state.pool())
        .create_category(&input)
        .await?;

    state.cache().invalidate_categories();

    Ok(ok(category))
}

/// Replace a category's fields.
///
/// # Errors
///
/// Returns 400 for a malformed slug, 404 if the category does not exist,
/// 409 on a slug clash.
pub async fn update(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(mut input): Json<CategoryInput>,
) -> Result<Json<Value>> {
    input.slug = super::resolve_slug(&input.slug, &input.name)?.to_string();

    let category = CatalogRepository::new(state.pool())
        .update_category(id, &input)
        .await?;

    state.cache().invalidate_categories();

    Ok(ok(category))
}

/// Delete a category. Member products keep their rows.
///
/// # Errors
///
/// Returns 404 if the category does not exist.
pub async fn delete(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Value>> {
    CatalogRepository::new(state.pool()).delete_category(id).await?;

    state.cache().invalidate_categories();

    Ok(ok(serde_json::json!({})))
}
