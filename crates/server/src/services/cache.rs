//! Content cache with explicit invalidation hooks.
//!
//! Caches the small, hot, read-mostly storefront surfaces: carousel slides,
//! categories, active offers, and featured reviews. Back-office write
//! handlers call the matching `invalidate_*` hook, so admin changes are
//! visible immediately; the TTL only bounds staleness if a hook is missed.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::db::{CatalogRepository, OfferRepository, RepositoryError, ReviewRepository};
use crate::models::{CarouselSlide, Category, Offer, Review};

/// Cache TTL (5 minutes).
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Shared cache for storefront content reads.
///
/// Each surface is a single-entry `moka` cache keyed on `()`; `moka` gives
/// us TTL expiry and request coalescing (concurrent misses run the loader
/// once).
#[derive(Clone)]
pub struct ContentCache {
    carousel: Cache<(), Arc<Vec<CarouselSlide>>>,
    categories: Cache<(), Arc<Vec<Category>>>,
    offers: Cache<(), Arc<Vec<Offer>>>,
    featured_reviews: Cache<(), Arc<Vec<Review>>>,
}

impl ContentCache {
    /// Create the cache with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        fn build<V: Clone + Send + Sync + 'static>() -> Cache<(), V> {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(CACHE_TTL)
                .build()
        }

        Self {
            carousel: build(),
            categories: build(),
            offers: build(),
            featured_reviews: build(),
        }
    }

    /// Active carousel slides, cached.
    ///
    /// # Errors
    ///
    /// Returns the loader's `RepositoryError` (shared between coalesced
    /// waiters, hence the `Arc`) if a cache miss hits the database and fails.
    pub async fn carousel(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<CarouselSlide>>, Arc<RepositoryError>> {
        self.carousel
            .try_get_with((), async {
                let slides = CatalogRepository::new(pool).list_slides(true).await?;
                Ok(Arc::new(slides))
            })
            .await
    }

    /// All categories, cached.
    ///
    /// # Errors
    ///
    /// Returns the loader's `RepositoryError` if a cache miss hits the
    /// database and fails.
    pub async fn categories(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<Category>>, Arc<RepositoryError>> {
        self.categories
            .try_get_with((), async {
                let categories = CatalogRepository::new(pool).list_categories().await?;
                Ok(Arc::new(categories))
            })
            .await
    }

    /// Active, unexpired offers, cached.
    ///
    /// # Errors
    ///
    /// Returns the loader's `RepositoryError` if a cache miss hits the
    /// database and fails.
    pub async fn offers(&self, pool: &PgPool) -> Result<Arc<Vec<Offer>>, Arc<RepositoryError>> {
        self.offers
            .try_get_with((), async {
                let offers = OfferRepository::new(pool).list(true).await?;
                Ok(Arc::new(offers))
            })
            .await
    }

    /// Featured, approved reviews, cached.
    ///
    /// # Errors
    ///
    /// Returns the loader's `RepositoryError` if a cache miss hits the
    /// database and fails.
    pub async fn featured_reviews(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<Review>>, Arc<RepositoryError>> {
        self.featured_reviews
            .try_get_with((), async {
                let reviews = ReviewRepository::new(pool).list_featured().await?;
                Ok(Arc::new(reviews))
            })
            .await
    }

    /// Invalidation hook for carousel writes.
    pub fn invalidate_carousel(&self) {
        self.carousel.invalidate_all();
    }

    /// Invalidation hook for category (and product-categorization) writes.
    pub fn invalidate_categories(&self) {
        self.categories.invalidate_all();
    }

    /// Invalidation hook for offer writes.
    pub fn invalidate_offers(&self) {
        self.offers.invalidate_all();
    }

    /// Invalidation hook for review writes and moderation.
    pub fn invalidate_reviews(&self) {
        self.featured_reviews.invalidate_all();
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}
