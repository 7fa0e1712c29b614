//! Catalog models: products, categories, carousel slides.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clove_core::{CategoryId, ProductId, SlideId};

/// A sellable product.
///
/// `stock_qty` is decremented inside the order-finalization transaction and
/// restored on cancellation; everything else is admin-mutated.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub sku: String,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub stock_qty: i32,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be purchased in quantity `qty`.
    #[must_use]
    pub const fn can_fulfill(&self, qty: i32) -> bool {
        self.active && self.stock_qty >= qty && qty > 0
    }
}

/// A product category, doubling as a public "collection".
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub position: i32,
}

/// A homepage carousel slide.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CarouselSlide {
    pub id: SlideId,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(active: bool, stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            title: "Test".into(),
            slug: "test".into(),
            sku: "SKU-1".into(),
            category_id: None,
            description: None,
            price: Decimal::new(1999, 2),
            compare_at_price: None,
            stock_qty: stock,
            images: vec![],
            tags: vec![],
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_fulfill() {
        assert!(product(true, 5).can_fulfill(5));
        assert!(!product(true, 5).can_fulfill(6));
        assert!(!product(true, 5).can_fulfill(0));
        assert!(!product(false, 5).can_fulfill(1));
    }
}
