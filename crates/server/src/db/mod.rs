//! Database layer: connection pool and repositories.
//!
//! One `PostgreSQL` database backs both surfaces. Each entity gets a
//! repository struct borrowing the pool; all queries use runtime binding
//! (`sqlx::query_as`), so the crate builds without a live database.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are run explicitly:
//! ```bash
//! cargo run -p clove-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

mod catalog;
mod customers;
mod offers;
mod orders;
mod reviews;
mod settings;
mod staff;

pub use catalog::{CatalogRepository, CategoryInput, NewProduct, ProductUpdate, SlideInput};
pub use customers::{AddressInput, CustomerRepository};
pub use offers::{OfferInput, OfferRepository, increment_usage};
pub use orders::{
    NewOrder, NewOrderItem, OrderFilter, OrderRepository, decrement_stock, insert_items,
    insert_order, restock_items,
};
pub use reviews::{NewReview, ReviewModeration, ReviewRepository};
pub use settings::{SettingsRepository, SettingsUpdate};
pub use staff::{NewTask, StaffRepository};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique-constraint violations into
    /// [`RepositoryError::Conflict`].
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_string());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
