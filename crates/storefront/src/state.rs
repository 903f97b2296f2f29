//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the Shopify client. Carts are not shared state: each
/// request rebuilds its cart from the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state with a client for the configured store.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        Self::with_storefront(config, storefront)
    }

    /// Create application state around an existing client.
    #[must_use]
    pub fn with_storefront(config: StorefrontConfig, storefront: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }
}
