//! Storecart storefront library.
//!
//! This crate provides the storefront HTTP service as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod shopify;
pub mod state;

use axum::{Router, body::Body, http::Request};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with its session, tracing and request ID layers.
///
/// Sentry layers are added by the binary so tests can run without a client.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};
    use secrecy::SecretString;
    use storecart_core::PricingPolicy;
    use tower::ServiceExt;

    use crate::config::{ShopifyStorefrontConfig, StorefrontConfig};

    fn test_state() -> AppState {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            shopify: ShopifyStorefrontConfig {
                store: "shop.example.com".to_string(),
                api_version: "2023-07".to_string(),
                access_token: SecretString::from("9f8e2c41ab07d5e63c1f0a9b8d7e6f5a"),
            },
            pricing: PricingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        AppState::new(config)
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app(test_state())
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let response = app(test_state())
            .oneshot(Request::get("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["items"], serde_json::json!([]));
        assert_eq!(body["subtotal"], "0.00");
        assert_eq!(body["isEmpty"], true);
    }

    #[tokio::test]
    async fn test_add_without_variant_or_handle_is_rejected() {
        let response = app(test_state())
            .oneshot(
                Request::post("/cart/add")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("id=A&price=10.00"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let response = app(test_state())
            .oneshot(Request::post("/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Your cart is empty.");
    }

    #[tokio::test]
    async fn test_api_checkout_rejects_unparseable_body_as_json_error() {
        let response = app(test_state())
            .oneshot(
                Request::post("/api/checkout")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Bad request: Invalid request body")
        );
    }

    #[tokio::test]
    async fn test_api_checkout_without_body_uses_empty_session_cart() {
        let response = app(test_state())
            .oneshot(Request::post("/api/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Your cart is empty.");
    }
}
