//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart (JSON, mutations send HX-Trigger: cart-updated)
//! GET  /cart                   - Cart contents and pricing summary
//! GET  /cart/count             - Total quantity for the badge
//! POST /cart/add               - Add to cart (merges by id)
//! POST /cart/update            - Update quantity (clamped to 1)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Remove all items
//!
//! # Checkout
//! POST /checkout               - Redirect to Shopify checkout (cart permalink)
//! POST /api/checkout           - Create a hosted checkout, returns its URL
//! ```

pub mod api;
pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(api::checkout::create))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", post(cart::checkout))
        // JSON API
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
