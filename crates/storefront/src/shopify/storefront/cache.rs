//! Cache types for Storefront API responses.

use storecart_core::VariantId;

/// Cache key for handle lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    VariantByHandle(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Variant(VariantId),
}
