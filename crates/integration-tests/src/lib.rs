//! Integration tests for storecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```
//!
//! Each [`TestContext`] serves the storefront on an ephemeral local port with
//! the Shopify Storefront API replaced by a `wiremock` server. No external
//! services are needed.
//!
//! # Test Categories
//!
//! - `cart_store` - Cart store, persistence and pricing through the public API
//! - `storefront_cart` - Cart routes over HTTP with session cookies
//! - `storefront_checkout` - Checkout hand-off against a mocked Shopify

use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use storecart_core::PricingPolicy;
use storecart_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use storecart_storefront::shopify::StorefrontClient;
use storecart_storefront::state::AppState;
use wiremock::MockServer;

/// Store domain used in test configuration.
pub const TEST_STORE: &str = "shop.example.com";

/// A running storefront plus a cookie-keeping client for it.
pub struct TestContext {
    /// Client that keeps the session cookie between requests.
    pub client: Client,
    /// Base URL of the running storefront.
    pub base_url: String,
    /// Stand-in for the Shopify Storefront API.
    pub shopify: MockServer,
}

impl TestContext {
    /// Start a storefront with default pricing.
    pub async fn new() -> Self {
        Self::with_pricing(PricingPolicy::default()).await
    }

    /// Start a storefront with custom pricing.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    pub async fn with_pricing(pricing: PricingPolicy) -> Self {
        let shopify = MockServer::start().await;

        let config = test_config(pricing);
        let storefront = StorefrontClient::with_endpoint(
            format!("{}/graphql.json", shopify.uri()),
            "test-token",
        );
        let state = AppState::with_storefront(config, storefront);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, storecart_storefront::app(state))
                .await
                .ok();
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
            shopify,
        }
    }

    /// A second shopper with their own session against the same server.
    #[must_use]
    pub fn new_shopper(&self) -> Client {
        new_client()
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a form to `path` with this context's client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }

    /// GET `path` and parse the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed")
            .json()
            .await
            .expect("Response is not JSON")
    }
}

/// Storefront configuration pointing at [`TEST_STORE`].
#[must_use]
pub fn test_config(pricing: PricingPolicy) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        shopify: ShopifyStorefrontConfig {
            store: TEST_STORE.to_string(),
            api_version: "2023-07".to_string(),
            access_token: SecretString::from("test-token"),
        },
        pricing,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
