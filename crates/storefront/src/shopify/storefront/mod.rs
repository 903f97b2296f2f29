//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for typed request bodies with `reqwest` 0.13 for HTTP.
//! Caches handle-to-variant lookups using `moka` (5-minute TTL).

mod cache;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use storecart_core::{CheckoutLineItem, VariantId};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{Checkout, CheckoutUserError, GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use queries::{
    CheckoutCreate, ProductVariantByHandle, checkout_create, error_code_name,
    product_variant_by_handle,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Resolves product variants and creates hosted checkouts. Variant lookups
/// are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self::with_endpoint(config.endpoint(), config.access_token())
    }

    /// Create a client against an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token: access_token.to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    ///
    /// # Errors
    ///
    /// Returns `RateLimited` on HTTP 429, `GraphQL` for non-success statuses,
    /// reported errors or an empty response, and `Parse` when the body is not
    /// a GraphQL response.
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            ))]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Resolve the first variant of the product with the given handle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist or has no variants,
    /// or an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn fetch_variant_id(&self, handle: &str) -> Result<VariantId, ShopifyError> {
        let cache_key = CacheKey::VariantByHandle(handle.to_string());

        if let Some(CacheValue::Variant(variant)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for variant");
            return Ok(variant);
        }

        let variables = product_variant_by_handle::Variables {
            handle: handle.to_string(),
        };

        let data = self.execute::<ProductVariantByHandle>(variables).await?;

        let raw_id = data
            .product_by_handle
            .and_then(|product| product.variants.edges.into_iter().next())
            .map(|edge| edge.node.id)
            .ok_or_else(|| ShopifyError::NotFound(format!("No variant for product: {handle}")))?;

        let variant = VariantId::parse(&raw_id)
            .map_err(|_| ShopifyError::NotFound(format!("No variant for product: {handle}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Variant(variant.clone()))
            .await;

        Ok(variant)
    }

    // =========================================================================
    // Checkout Methods
    // =========================================================================

    /// Create a hosted checkout for the given line items.
    ///
    /// # Errors
    ///
    /// Returns `UserErrors` when Shopify rejects the input, `UserError` when
    /// no checkout comes back, or an error if the API request fails.
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn create_checkout(
        &self,
        line_items: &[CheckoutLineItem],
    ) -> Result<Checkout, ShopifyError> {
        let variables = checkout_create::Variables {
            line_items: line_items.iter().map(Into::into).collect(),
        };

        let data = self.execute::<CheckoutCreate>(variables).await?;

        let payload = data
            .checkout_create
            .ok_or_else(|| ShopifyError::UserError("Could not create checkout".to_string()))?;

        if !payload.checkout_user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(
                payload
                    .checkout_user_errors
                    .into_iter()
                    .map(|e| CheckoutUserError {
                        code: e.code.as_ref().and_then(error_code_name),
                        field: e.field.unwrap_or_default(),
                        message: e.message,
                    })
                    .collect(),
            ));
        }

        let checkout = payload
            .checkout
            .ok_or_else(|| ShopifyError::UserError("Could not create checkout".to_string()))?;

        debug!(checkout_id = %checkout.id, "Created checkout");

        Ok(Checkout {
            id: checkout.id,
            web_url: checkout.web_url,
        })
    }
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}
