//! Public review handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;

use crate::db::{CatalogRepository, NewReview, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::routes::ok;
use crate::state::AppState;

/// Approved reviews for one product, looked up by product slug.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn list_for_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let product = CatalogRepository::new(state.pool())
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}'")))?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product.id)
        .await?;

    Ok(ok(reviews))
}

/// Featured reviews for the homepage (cached).
///
/// # Errors
///
/// Returns an error if the cache loader's database query fails.
pub async fn featured(State(state): State<AppState>) -> Result<Json<Value>> {
    let reviews = state.cache().featured_reviews(state.pool()).await?;
    Ok(ok(&*reviews))
}

/// Submit a review. Requires a logged-in customer; new reviews start
/// unapproved and only become visible after moderation.
///
/// # Errors
///
/// Returns 400 if the rating is out of range, or a database error.
pub async fn create(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Json(input): Json<NewReview>,
) -> Result<Json<Value>> {
    if !(1..=5).contains(&input.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let review = ReviewRepository::new(state.pool())
        .create(customer.id, &customer.name, &input)
        .await?;

    Ok(ok(review))
}
