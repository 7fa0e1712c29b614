//! Integration test helpers for Clove.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p clove-cli -- migrate
//!
//! # Start the server
//! cargo run -p clove-server
//!
//! # Run the (ignored-by-default) integration tests
//! cargo test -p clove-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a live server over HTTP; `CLOVE_BASE_URL` points them at
//! it (default `http://localhost:3000`).

use reqwest::Client;
use serde_json::Value;

/// Base URL for the server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CLOVE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client with a cookie store, so sessions survive across requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email for test account registration.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.example", uuid::Uuid::new_v4().simple())
}

/// Register a fresh customer and leave the session logged in.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_customer(client: &Client, email: &str) -> Value {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&serde_json::json!({
            "email": email,
            "name": "Test Customer",
            "password": "correct horse battery",
        }))
        .send()
        .await
        .expect("register request failed");

    assert!(resp.status().is_success(), "registration failed");
    let body: Value = resp.json().await.expect("invalid register response");
    assert_eq!(body["success"], true);
    body["data"].clone()
}

/// Log a staff member in on the given client.
///
/// Credentials come from `CLOVE_TEST_STAFF_EMAIL` / `CLOVE_TEST_STAFF_PASSWORD`,
/// pointing at an account created via `clove-cli staff create`.
///
/// # Panics
///
/// Panics if the env vars are unset or the login fails.
pub async fn login_staff(client: &Client) -> Value {
    let email = std::env::var("CLOVE_TEST_STAFF_EMAIL").expect("CLOVE_TEST_STAFF_EMAIL unset");
    let password =
        std::env::var("CLOVE_TEST_STAFF_PASSWORD").expect("CLOVE_TEST_STAFF_PASSWORD unset");

    let resp = client
        .post(format!("{}/api/admin/auth/login", base_url()))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("staff login request failed");

    assert!(resp.status().is_success(), "staff login failed");
    let body: Value = resp.json().await.expect("invalid login response");
    assert_eq!(body["success"], true);
    body["data"].clone()
}
