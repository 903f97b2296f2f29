//! Session-related types.

/// Session keys for cart data.
pub mod keys {
    /// Key for the serialized cart (a JSON array of line items).
    pub const CART: &str = storecart_core::CART_STORAGE_KEY;
}
