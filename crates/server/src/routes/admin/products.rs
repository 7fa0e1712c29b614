//! Back-office product handlers.
//!
//! Creation is superuser-only; edits and removal are open to admins.
//! "Delete" deactivates: order lines keep a foreign key to the product row,
//! so rows referenced by history are never dropped.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use clove_core::ProductId;

use crate::db::{CatalogRepository, NewProduct, ProductUpdate};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireSuperuser, RequireWorker};
use crate::routes::ok;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the back-office product list.
#[derive(Debug, Default, Deserialize)]
pub struct AdminProductQuery {
    pub search: Option<String>,
    pub collection: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List products, including deactivated ones.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
    Query(query): Query<AdminProductQuery>,
) -> Result<Json<Value>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let products = CatalogRepository::new(state.pool())
        .list_products(
            query.search.as_deref(),
            query.collection.as_deref(),
            false,
            limit,
            offset,
        )
        .await?;

    Ok(ok(products))
}

/// Get one product by id.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn get(
    RequireWorker(_staff): RequireWorker,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let product = CatalogRepository::new(state.pool())
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(ok(product))
}

/// Create a product.
///
/// # Errors
///
/// Returns 400 for a malformed slug, 409 if the slug is taken.
pub async fn create(
    RequireSuperuser(staff): RequireSuperuser,
    State(state): State<AppState>,
    Json(mut input): Json<NewProduct>,
) -> Result<Json<Value>> {
    input.slug = super::resolve_slug(&input.slug, &input.title)?.to_string();

    let product = CatalogRepository::new(state.pool())
        .create_product(&input)
        .await?;

    state.cache().invalidate_categories();
    tracing::info!(product_id = %product.id, staff = %staff.email, "product created");

    Ok(ok(product))
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn update(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Value>> {
    let product = CatalogRepository::new(state.pool())
        .update_product(id, &update)
        .await?;

    state.cache().invalidate_categories();

    Ok(ok(product))
}

/// Deactivate a product.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn deactivate(
    RequireAdmin(staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    CatalogRepository::new(state.pool())
        .deactivate_product(id)
        .await?;

    state.cache().invalidate_categories();
    tracing::info!(product_id = %id, staff = %staff.email, "product deactivated");

    Ok(ok(serde_json::json!({})))
}
