//! Product review model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clove_core::{CustomerId, ProductId, ReviewId};

/// A customer review, optionally tied to a product.
///
/// Only approved reviews appear on the storefront; the `featured` flag is
/// admin-set and drives the cached homepage set.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: Option<ProductId>,
    pub customer_id: Option<CustomerId>,
    pub author_name: String,
    pub rating: i32,
    pub body: String,
    pub featured: bool,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}
