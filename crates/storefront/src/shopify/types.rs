//! Domain types for the Shopify Storefront API.
//!
//! These types are what the rest of the storefront sees, separate from the
//! raw response shapes in `storefront::queries`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Checkout Types
// =============================================================================

/// Hosted checkout created from the local cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Shopify checkout ID.
    pub id: String,
    /// URL the shopper is redirected to.
    pub web_url: String,
}

/// Error from `checkoutCreate` describing a rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutUserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Vec<String>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
