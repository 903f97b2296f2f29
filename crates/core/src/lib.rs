//! storecart core - cart state, pricing and persistence.
//!
//! This crate provides the pieces shared by every storecart frontend:
//! - `storefront` - HTTP service keeping one cart per browser session
//! - `cli` - Command-line cart backed by a local storage file
//!
//! # Architecture
//!
//! The core crate contains types, pure derivations and the cart store itself.
//! It performs no network I/O; persistence goes through the [`KeyValueSlot`]
//! trait so each frontend decides where the serialized cart lives.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, quantities and line items
//! - [`pricing`] - Subtotal, tax, total and free-shipping derivation
//! - [`persistence`] - Key-value slots and the cart persistence adapter
//! - [`cart`] - The cart store
//! - [`checkout`] - Encoding a cart for the commerce backend's checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod persistence;
pub mod pricing;
pub mod types;

#[cfg(test)]
mod strategies;

pub use cart::{CartState, CartStore};
pub use checkout::{CheckoutError, CheckoutLineItem, cart_permalink, checkout_line_items};
pub use persistence::{CART_STORAGE_KEY, CartPersistence, KeyValueSlot, MemorySlot, StorageError};
pub use pricing::{CartSummary, PricingPolicy};
pub use types::*;
