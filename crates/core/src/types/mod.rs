//! Core types for storecart.
//!
//! This module provides type-safe wrappers for the values a cart line carries.

pub mod id;
pub mod line_item;
pub mod price;
pub mod quantity;

pub use id::{IdError, LineItemId, VariantId};
pub use line_item::{CartError, LineImage, LineItem, LineItemInput};
pub use price::{CurrencyCode, CurrencyError, Money, PriceError};
pub use quantity::Quantity;
