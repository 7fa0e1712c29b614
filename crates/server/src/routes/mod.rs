//! HTTP route handlers.
//!
//! The storefront API lives under `/api`, the back office under
//! `/api/admin` (see [`admin`] for its route table). Every success response
//! uses the envelope `{"success": true, "data": ...}`; errors come back as
//! `{"success": false, "error": "..."}` via `AppError`.
//!
//! ```text
//! GET  /health                         - Liveness probe
//! GET  /ready                          - Readiness probe (checks the db)
//!
//! # Catalog
//! GET  /api/products                   - Active products (search, collection, paging)
//! GET  /api/products/{slug}            - Product detail
//! GET  /api/products/{slug}/reviews    - Approved reviews for a product
//! GET  /api/collections                - All collections (cached)
//! GET  /api/collections/{slug}         - Collection with its products
//! GET  /api/carousel                   - Active carousel slides (cached)
//!
//! # Reviews
//! GET  /api/reviews/featured           - Featured reviews (cached)
//! POST /api/reviews                    - Submit a review (customer)
//!
//! # Offers
//! GET  /api/offers                     - Active offers (cached)
//! POST /api/offers/validate            - Quote a discount for a cart
//!
//! # Checkout
//! POST /api/checkout/session           - Open a gateway payment session
//! POST /api/checkout/verify            - Verify payment, finalize order
//! POST /api/checkout/cod               - Place a cash-on-delivery order
//!
//! # Auth & account
//! POST /api/auth/register              - Register and log in
//! POST /api/auth/login                 - Log in
//! POST /api/auth/logout                - Log out
//! GET  /api/auth/me                    - Current customer
//! GET  /api/account/addresses          - Saved addresses (customer)
//! POST /api/account/addresses          - Save an address (customer)
//! DELETE /api/account/addresses/{id}   - Delete an address (customer)
//!
//! # Orders
//! GET  /api/orders                     - Own orders (customer)
//! GET  /api/orders/{number}            - Order detail (owner, or guest + email)
//! POST /api/orders/{number}/cancel     - Cancel a pre-delivery order
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod offers;
pub mod orders;
pub mod reviews;

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::state::AppState;

/// Wrap a payload in the standard success envelope.
pub fn ok(data: impl Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness probe; verifies the database is reachable.
///
/// # Errors
///
/// Returns 500 if the database round-trip fails.
pub async fn ready(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(crate::db::RepositoryError::from)?;
    Ok(Json(json!({ "status": "ready" })))
}

/// Build the storefront API router (mounted under `/api`).
fn storefront_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{slug}", get(catalog::get_product))
        .route("/products/{slug}/reviews", get(reviews::list_for_product))
        .route("/collections", get(catalog::list_collections))
        .route("/collections/{slug}", get(catalog::get_collection))
        .route("/carousel", get(catalog::carousel))
        .route("/reviews", post(reviews::create))
        .route("/reviews/featured", get(reviews::featured))
        .route("/offers", get(offers::list))
        .route("/offers/validate", post(offers::validate))
        .route("/checkout/session", post(checkout::create_session))
        .route("/checkout/verify", post(checkout::verify_payment))
        .route("/checkout/cod", post(checkout::place_cod_order))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/account/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route("/account/addresses/{id}", delete(account::delete_address))
        .route("/orders", get(orders::list_own))
        .route("/orders/{number}", get(orders::get))
        .route("/orders/{number}/cancel", post(orders::cancel))
}

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .nest("/api", storefront_router())
        .nest("/api/admin", admin::router())
}
