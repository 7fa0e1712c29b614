//! Catalog repository: products, categories, carousel slides.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use clove_core::{CategoryId, ProductId, SlideId};

use super::RepositoryError;
use crate::models::{CarouselSlide, Category, Product};

const PRODUCT_COLUMNS: &str = "id, title, slug, sku, category_id, description, price, \
     compare_at_price, stock_qty, images, tags, active, created_at, updated_at";

const CATEGORY_COLUMNS: &str = "id, name, slug, description, image_url, featured, position";

const SLIDE_COLUMNS: &str = "id, title, subtitle, image_url, link_url, position, active";

/// Fields for creating a product.
#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub title: String,
    /// Validated (or derived from the title) by the route handler.
    #[serde(default)]
    pub slug: String,
    pub sku: String,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub stock_qty: i32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields for updating a product. `None` leaves the column untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub category_id: Option<CategoryId>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub stock_qty: Option<i32>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Fields for creating or replacing a category.
#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    /// Validated (or derived from the name) by the route handler.
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub position: i32,
}

/// Fields for creating or replacing a carousel slide.
#[derive(Debug, Deserialize)]
pub struct SlideInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

/// Repository for catalog entities.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products, optionally filtered by a search term and category slug.
    ///
    /// `only_active` hides deactivated products (the storefront view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(
        &self,
        search: Option<&str>,
        category_slug: Option<&str>,
        only_active: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT p.{columns}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%'
                                     OR $1 = ANY(p.tags))
               AND ($2::text IS NULL OR c.slug = $2)
               AND (NOT $3 OR p.active)
             ORDER BY p.created_at DESC
             LIMIT $4 OFFSET $5",
            columns = PRODUCT_COLUMNS.replace(", ", ", p.")
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(search)
            .bind(category_slug)
            .bind(only_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Fetch several products at once (checkout draft validation).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&raw)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create_product(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products
                 (title, slug, sku, category_id, description, price,
                  compare_at_price, stock_qty, images, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.sku)
            .bind(input.category_id)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.compare_at_price)
            .bind(input.stock_qty)
            .bind(&input.images)
            .bind(&input.tags)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "product slug already exists"))
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products SET
                 title = COALESCE($2, title),
                 category_id = COALESCE($3, category_id),
                 description = COALESCE($4, description),
                 price = COALESCE($5, price),
                 compare_at_price = COALESCE($6, compare_at_price),
                 stock_qty = COALESCE($7, stock_qty),
                 images = COALESCE($8, images),
                 tags = COALESCE($9, tags),
                 active = COALESCE($10, active),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&update.title)
            .bind(update.category_id)
            .bind(&update.description)
            .bind(update.price)
            .bind(update.compare_at_price)
            .bind(update.stock_qty)
            .bind(&update.images)
            .bind(&update.tags)
            .bind(update.active)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Deactivate a product.
    ///
    /// Products referenced by order lines are never hard-deleted; "delete"
    /// from the back-office hides them from the storefront.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn deactivate_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET active = FALSE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY position, name");
        let categories = sqlx::query_as::<_, Category>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(categories)
    }

    /// Get a category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1");
        let category = sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(category)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let sql = format!(
            "INSERT INTO categories (name, slug, description, image_url, featured, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.featured)
            .bind(input.position)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "category slug already exists"))
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let sql = format!(
            "UPDATE categories
             SET name = $2, slug = $3, description = $4, image_url = $5,
                 featured = $6, position = $7
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.featured)
            .bind(input.position)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "category slug already exists"))?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Products keep their rows (`category_id` nulls out).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    // Carousel
    // =========================================================================

    /// List carousel slides; `only_active` is the storefront view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_slides(&self, only_active: bool) -> Result<Vec<CarouselSlide>, RepositoryError> {
        let sql = format!(
            "SELECT {SLIDE_COLUMNS} FROM carousel_slides
             WHERE NOT $1 OR active
             ORDER BY position, id"
        );
        let slides = sqlx::query_as::<_, CarouselSlide>(&sql)
            .bind(only_active)
            .fetch_all(self.pool)
            .await?;
        Ok(slides)
    }

    /// Create a carousel slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_slide(&self, input: &SlideInput) -> Result<CarouselSlide, RepositoryError> {
        let sql = format!(
            "INSERT INTO carousel_slides (title, subtitle, image_url, link_url, position, active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SLIDE_COLUMNS}"
        );
        let slide = sqlx::query_as::<_, CarouselSlide>(&sql)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.image_url)
            .bind(&input.link_url)
            .bind(input.position)
            .bind(input.active)
            .fetch_one(self.pool)
            .await?;
        Ok(slide)
    }

    /// Replace a carousel slide's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the slide does not exist.
    pub async fn update_slide(
        &self,
        id: SlideId,
        input: &SlideInput,
    ) -> Result<CarouselSlide, RepositoryError> {
        let sql = format!(
            "UPDATE carousel_slides
             SET title = $2, subtitle = $3, image_url = $4, link_url = $5,
                 position = $6, active = $7
             WHERE id = $1
             RETURNING {SLIDE_COLUMNS}"
        );
        sqlx::query_as::<_, CarouselSlide>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.image_url)
            .bind(&input.link_url)
            .bind(input.position)
            .bind(input.active)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a carousel slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the slide does not exist.
    pub async fn delete_slide(&self, id: SlideId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM carousel_slides WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
