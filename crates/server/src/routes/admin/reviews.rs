//! Back-office review moderation. Admin tier.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use clove_core::ReviewId;

use crate::db::{ReviewModeration, ReviewRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::ok;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the moderation list.
#[derive(Debug, Default, Deserialize)]
pub struct AdminReviewQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List all reviews, approved or not.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminReviewQuery>,
) -> Result<Json<Value>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let reviews = ReviewRepository::new(state.pool())
        .list_all(limit, offset)
        .await?;
    Ok(ok(reviews))
}

/// Apply moderation flags (approve, feature) to a review.
///
/// # Errors
///
/// Returns 404 if the review does not exist.
pub async fn moderate(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
    Json(moderation): Json<ReviewModeration>,
) -> Result<Json<Value>> {
    let review = ReviewRepository::new(state.pool())
        .moderate(id, &moderation)
        .await?;

    state.cache().invalidate_reviews();

    Ok(ok(review))
}

/// Delete a review.
///
/// # Errors
///
/// Returns 404 if the review does not exist.
pub async fn delete(
    RequireAdmin(_staff): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<Value>> {
    ReviewRepository::new(state.pool()).delete(id).await?;

    state.cache().invalidate_reviews();

    Ok(ok(serde_json::json!({})))
}
