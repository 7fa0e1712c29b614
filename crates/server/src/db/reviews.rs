//! Review repository.

use serde::Deserialize;
use sqlx::PgPool;

use clove_core::{CustomerId, ProductId, ReviewId};

use super::RepositoryError;
use crate::models::Review;

const REVIEW_COLUMNS: &str =
    "id, product_id, customer_id, author_name, rating, body, featured, approved, created_at";

/// Fields for submitting a review.
#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub product_id: Option<ProductId>,
    pub rating: i32,
    pub body: String,
}

/// Admin moderation flags. `None` leaves a flag untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewModeration {
    pub featured: Option<bool>,
    pub approved: Option<bool>,
}

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved reviews for one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE product_id = $1 AND approved
             ORDER BY created_at DESC"
        );
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?;
        Ok(reviews)
    }

    /// Approved reviews flagged for the homepage.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_featured(&self) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE featured AND approved
             ORDER BY created_at DESC"
        );
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(reviews)
    }

    /// All reviews, for back-office moderation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(reviews)
    }

    /// Submit a review. New reviews start unapproved and unfeatured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        author_name: &str,
        input: &NewReview,
    ) -> Result<Review, RepositoryError> {
        let sql = format!(
            "INSERT INTO reviews (product_id, customer_id, author_name, rating, body)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {REVIEW_COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(input.product_id)
            .bind(customer_id)
            .bind(author_name)
            .bind(input.rating)
            .bind(&input.body)
            .fetch_one(self.pool)
            .await?;
        Ok(review)
    }

    /// Apply moderation flags to a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn moderate(
        &self,
        id: ReviewId,
        moderation: &ReviewModeration,
    ) -> Result<Review, RepositoryError> {
        let sql = format!(
            "UPDATE reviews
             SET featured = COALESCE($2, featured),
                 approved = COALESCE($3, approved)
             WHERE id = $1
             RETURNING {REVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(moderation.featured)
            .bind(moderation.approved)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review does not exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
