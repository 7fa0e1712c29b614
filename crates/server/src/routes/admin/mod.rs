//! Back-office route handlers, mounted under `/api/admin`.
//!
//! Every handler except login takes one of the role-tiered extractors.
//! Role legend: W = any staff (worker and up), A = admin and up,
//! S = superuser only.
//!
//! ```text
//! POST   /auth/login                - Staff login
//! POST   /auth/logout               - Staff logout
//! GET    /auth/me                   - Current staff identity        (W)
//!
//! GET    /products                  - Product list, incl. inactive  (W)
//! POST   /products                  - Create product                (S)
//! GET    /products/{id}             - Product detail                (W)
//! PATCH  /products/{id}             - Partial update                (A)
//! DELETE /products/{id}             - Deactivate                    (A)
//!
//! GET    /categories                - Category list                 (W)
//! POST   /categories                - Create                        (A)
//! PUT    /categories/{id}           - Replace                       (A)
//! DELETE /categories/{id}           - Delete                        (A)
//!
//! GET    /orders                    - Order list with filters       (W)
//! GET    /orders/{id}               - Order with line items         (W)
//! PATCH  /orders/{id}/status        - Advance status                (W)
//! POST   /orders/{id}/cancel        - Cancel + restock              (A)
//! PATCH  /orders/{id}/refund        - Advance refund workflow       (S)
//!
//! GET    /reviews                   - Moderation list               (A)
//! PATCH  /reviews/{id}              - Approve / feature             (A)
//! DELETE /reviews/{id}              - Delete                        (A)
//!
//! GET    /customers                 - Customer list                 (A)
//! GET    /customers/{id}            - Customer with orders          (A)
//!
//! GET    /settings                  - Site settings                 (W)
//! PATCH  /settings                  - Update settings               (A)
//! GET    /carousel                  - All slides                    (A)
//! POST   /carousel                  - Create slide                  (A)
//! PUT    /carousel/{id}             - Replace slide                 (A)
//! DELETE /carousel/{id}             - Delete slide                  (A)
//!
//! GET    /offers                    - All offers                    (A)
//! POST   /offers                    - Create                        (A)
//! PUT    /offers/{id}               - Replace                       (A)
//! DELETE /offers/{id}               - Delete                        (A)
//!
//! POST   /staff                     - Create staff account          (S)
//! GET    /staff                     - Staff list                    (A)
//! POST   /tasks                     - Create task                   (S)
//! GET    /tasks                     - Task list (workers: own only) (W)
//! PATCH  /tasks/{id}/status         - Update task status            (W, assignee or admin)
//! ```

pub mod categories;
pub mod customers;
pub mod offers;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod staff;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use clove_core::Slug;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireWorker, clear_current_staff, set_current_staff};
use crate::models::CurrentStaff;
use crate::routes::ok;
use crate::services::AuthService;
use crate::state::AppState;

/// Staff login request body.
#[derive(Debug, Deserialize)]
pub struct StaffLoginRequest {
    pub email: String,
    pub password: String,
}

/// Log a staff member in.
///
/// # Errors
///
/// Returns 401 for bad credentials or a deactivated account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<StaffLoginRequest>,
) -> Result<Json<Value>> {
    let staff = AuthService::new(state.pool())
        .login_staff(&request.email, &request.password)
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session rotation failed: {e}")))?;

    let current = CurrentStaff::from(&staff);
    set_current_staff(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    set_sentry_user(&current.id, Some(&current.email));
    tracing::info!(staff = %current.email, role = %current.role, "staff logged in");

    Ok(ok(current))
}

/// Log the current staff member out.
///
/// # Errors
///
/// Returns 500 if the session cannot be modified.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_staff(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    clear_sentry_user();

    Ok(ok(serde_json::json!({})))
}

/// The current staff identity, from the session.
///
/// # Errors
///
/// Returns 401 when not logged in.
pub async fn me(RequireWorker(staff): RequireWorker) -> Result<Json<Value>> {
    Ok(ok(staff))
}

/// Resolve a catalog slug from admin input: parse an explicit slug, or
/// derive one from the display text when the client sent none.
fn resolve_slug(explicit: &str, display_text: &str) -> Result<Slug> {
    if explicit.is_empty() {
        return Slug::from_title(display_text).ok_or_else(|| {
            AppError::BadRequest("cannot derive a slug; provide one explicitly".to_string())
        });
    }
    Slug::parse(explicit).map_err(|e| AppError::BadRequest(format!("invalid slug: {e}")))
}

/// Build the back-office router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::deactivate),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/status", patch(orders::set_status))
        .route("/orders/{id}/cancel", post(orders::cancel))
        .route("/orders/{id}/refund", patch(orders::update_refund))
        .route("/reviews", get(reviews::list))
        .route(
            "/reviews/{id}",
            patch(reviews::moderate).delete(reviews::delete),
        )
        .route("/customers", get(customers::list))
        .route("/customers/{id}", get(customers::get))
        .route(
            "/settings",
            get(settings::get_settings).patch(settings::update_settings),
        )
        .route(
            "/carousel",
            get(settings::list_slides).post(settings::create_slide),
        )
        .route(
            "/carousel/{id}",
            put(settings::update_slide).delete(settings::delete_slide),
        )
        .route("/offers", get(offers::list).post(offers::create))
        .route("/offers/{id}", put(offers::update).delete(offers::delete))
        .route("/staff", get(staff::list).post(staff::create))
        .route("/tasks", get(staff::list_tasks).post(staff::create_task))
        .route("/tasks/{id}/status", patch(staff::set_task_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slug_parsed() {
        let slug = resolve_slug("scented-candle", "whatever").expect("slug");
        assert_eq!(slug.as_str(), "scented-candle");
    }

    #[test]
    fn test_malformed_slug_rejected() {
        assert!(matches!(
            resolve_slug("Scented Candle", "whatever"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            resolve_slug("-edge", "whatever"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_omitted_slug_derived_from_title() {
        let slug = resolve_slug("", "Scented Candle (Large)").expect("slug");
        assert_eq!(slug.as_str(), "scented-candle-large");
    }

    #[test]
    fn test_underivable_slug_rejected() {
        assert!(matches!(
            resolve_slug("", "!!!"),
            Err(AppError::BadRequest(_))
        ));
    }
}
