//! Integration tests for the public catalog surface.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p clove-server)
//!
//! Run with: cargo test -p clove-integration-tests -- --ignored

use clove_integration_tests::{base_url, client};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_and_readiness() {
    let client = client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/ready", base_url()))
        .send()
        .await
        .expect("ready request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_product_list_envelope() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("product list request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("invalid response body");
    assert_eq!(body["success"], true);
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_unknown_product_is_404_with_error_envelope() {
    let client = client();

    let resp = client
        .get(format!("{}/api/products/no-such-product", base_url()))
        .send()
        .await
        .expect("product request failed");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("invalid response body");
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_collections_and_carousel_are_cached_reads() {
    let client = client();

    for path in ["/api/collections", "/api/carousel", "/api/reviews/featured"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("cached read request failed");

        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        let body: Value = resp.json().await.expect("invalid response body");
        assert_eq!(body["success"], true, "GET {path}");
    }
}
