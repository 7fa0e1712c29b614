//! Offer repository.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};

use clove_core::OfferId;

use super::RepositoryError;
use crate::models::Offer;

const OFFER_COLUMNS: &str = "id, code, description, percent_off, amount_off, \
     min_order_total, max_uses, used_count, active, expires_at";

/// Fields for creating or replacing an offer.
#[derive(Debug, Deserialize)]
pub struct OfferInput {
    pub code: String,
    pub description: Option<String>,
    pub percent_off: Option<Decimal>,
    pub amount_off: Option<Decimal>,
    pub min_order_total: Option<Decimal>,
    pub max_uses: Option<i32>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

const fn default_true() -> bool {
    true
}

/// Increment an offer's redemption counter (checkout transaction).
///
/// The `used_count < max_uses` guard is repeated here: two checkouts can
/// both pass `check_redeemable` before either commits, and only the row
/// lock on this update serializes them. Returns `false` if the offer has
/// no redemptions left, which the caller must treat as a rollback.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn increment_usage(conn: &mut PgConnection, code: &str) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE offers SET used_count = used_count + 1
         WHERE code = $1 AND (max_uses IS NULL OR used_count < max_uses)",
    )
    .bind(code)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Repository for discount offers.
pub struct OfferRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OfferRepository<'a> {
    /// Create a new offer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List offers; `only_active` restricts to active, unexpired codes
    /// (the storefront view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, only_active: bool) -> Result<Vec<Offer>, RepositoryError> {
        let sql = format!(
            "SELECT {OFFER_COLUMNS} FROM offers
             WHERE NOT $1 OR (active AND (expires_at IS NULL OR expires_at > now()))
             ORDER BY code"
        );
        let offers = sqlx::query_as::<_, Offer>(&sql)
            .bind(only_active)
            .fetch_all(self.pool)
            .await?;
        Ok(offers)
    }

    /// Look up an offer by code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Offer>, RepositoryError> {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE upper(code) = upper($1)");
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(code)
            .fetch_optional(self.pool)
            .await?;
        Ok(offer)
    }

    /// Create an offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is taken.
    pub async fn create(&self, input: &OfferInput) -> Result<Offer, RepositoryError> {
        let sql = format!(
            "INSERT INTO offers
                 (code, description, percent_off, amount_off, min_order_total,
                  max_uses, active, expires_at)
             VALUES (upper($1), $2, $3, $4, $5, $6, $7, $8)
             RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&sql)
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.percent_off)
            .bind(input.amount_off)
            .bind(input.min_order_total)
            .bind(input.max_uses)
            .bind(input.active)
            .bind(input.expires_at)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "offer code already exists"))
    }

    /// Replace an offer's fields. The redemption counter is preserved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the offer does not exist.
    pub async fn update(&self, id: OfferId, input: &OfferInput) -> Result<Offer, RepositoryError> {
        let sql = format!(
            "UPDATE offers
             SET code = upper($2), description = $3, percent_off = $4, amount_off = $5,
                 min_order_total = $6, max_uses = $7, active = $8, expires_at = $9
             WHERE id = $1
             RETURNING {OFFER_COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&sql)
            .bind(id)
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.percent_off)
            .bind(input.amount_off)
            .bind(input.min_order_total)
            .bind(input.max_uses)
            .bind(input.active)
            .bind(input.expires_at)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "offer code already exists"))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete an offer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the offer does not exist.
    pub async fn delete(&self, id: OfferId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
