//! Public catalog handlers: products, collections, carousel.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::routes::ok;
use crate::state::AppState;

/// Default and maximum page sizes for product listings.
const DEFAULT_PAGE_SIZE: i64 = 24;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// Free-text search over titles and tags.
    pub search: Option<String>,
    /// Restrict to one collection by slug.
    pub collection: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List active products.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
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
            true,
            limit,
            offset,
        )
        .await?;

    Ok(ok(products))
}

/// Get one active product by slug.
///
/// # Errors
///
/// Returns 404 if the product does not exist or is deactivated.
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let product = CatalogRepository::new(state.pool())
        .get_product_by_slug(&slug)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    Ok(ok(product))
}

/// List all collections (cached).
///
/// # Errors
///
/// Returns an error if the cache loader's database query fails.
pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = state.cache().categories(state.pool()).await?;
    Ok(ok(&*categories))
}

/// Get one collection with its active products.
///
/// # Errors
///
/// Returns 404 if the collection does not exist.
pub async fn get_collection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let repo = CatalogRepository::new(state.pool());

    let category = repo
        .get_category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection '{slug}'")))?;

    let products = repo
        .list_products(None, Some(&slug), true, MAX_PAGE_SIZE, 0)
        .await?;

    Ok(ok(serde_json::json!({
        "collection": category,
        "products": products,
    })))
}

/// List active carousel slides (cached).
///
/// # Errors
///
/// Returns an error if the cache loader's database query fails.
pub async fn carousel(State(state): State<AppState>) -> Result<Json<Value>> {
    let slides = state.cache().carousel(state.pool()).await?;
    Ok(ok(&*slides))
}
