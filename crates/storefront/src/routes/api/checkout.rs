//! Hosted checkout creation.
//!
//! Creates a Shopify checkout with `checkoutCreate` and returns its web URL
//! for the client to navigate to. The request may carry its own line items;
//! otherwise the session cart is used.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use storecart_core::{CheckoutError, CheckoutLineItem, checkout_line_items};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::cart::load_cart;
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Lines to check out; the session cart when absent.
    #[serde(default)]
    pub line_items: Option<Vec<CheckoutLineItem>>,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
}

/// Create a hosted checkout.
///
/// Responds 400 `{"error": "Your cart is empty."}` for nothing to check out,
/// 400 `{"errors": [...]}` when Shopify rejects the lines, and 502 when the
/// checkout cannot be created. The cart is never modified.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    body: std::result::Result<Option<Json<CheckoutRequest>>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let request = body
        .map_err(|rejection| {
            AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        })?
        .map(|Json(r)| r)
        .unwrap_or_default();

    let line_items = match request.line_items {
        Some(lines) => validate_lines(lines)?,
        None => {
            let cart = load_cart(&state, &session).await;
            checkout_line_items(cart.items())?
        }
    };

    let checkout = state
        .storefront()
        .create_checkout(&line_items)
        .await
        .map_err(AppError::from_checkout)?;

    tracing::info!(lines = line_items.len(), "Checkout created");

    Ok(Json(CheckoutResponse {
        checkout_url: checkout.web_url,
    }))
}

/// Reject empty requests and lines that cannot name a variant.
fn validate_lines(lines: Vec<CheckoutLineItem>) -> Result<Vec<CheckoutLineItem>> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }

    if lines
        .iter()
        .any(|line| line.variant_id.trim().is_empty() || line.quantity == 0)
    {
        return Err(AppError::BadRequest("Invalid line items".to_string()));
    }

    Ok(lines)
}
