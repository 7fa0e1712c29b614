//! Customer authentication handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireCustomer, clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::routes::ok;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a customer account and log it in.
///
/// # Errors
///
/// Returns 400 for an invalid email or weak password, 409 if the email is
/// already registered.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    let customer = AuthService::new(state.pool())
        .register_customer(&request.email, &request.name, &request.password)
        .await?;

    let current = CurrentCustomer::from(&customer);
    set_current_customer(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    set_sentry_user(&current.id, Some(&current.email));
    tracing::info!(customer_id = %current.id, "customer registered");

    Ok(ok(current))
}

/// Log a customer in.
///
/// # Errors
///
/// Returns 401 for bad credentials.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let customer = AuthService::new(state.pool())
        .login_customer(&request.email, &request.password)
        .await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session rotation failed: {e}")))?;

    let current = CurrentCustomer::from(&customer);
    set_current_customer(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    set_sentry_user(&current.id, Some(&current.email));

    Ok(ok(current))
}

/// Log the current customer out.
///
/// # Errors
///
/// Returns 500 if the session cannot be modified.
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_current_customer(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    clear_sentry_user();

    Ok(ok(serde_json::json!({})))
}

/// The current customer, from the session.
///
/// # Errors
///
/// Returns 401 when not logged in.
pub async fn me(RequireCustomer(customer): RequireCustomer) -> Result<Json<Value>> {
    Ok(ok(customer))
}
