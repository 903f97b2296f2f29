//! GraphQL operations sent to the Shopify Storefront API.
//!
//! Operations live in `graphql/storefront/queries/`, checked against the
//! schema subset in `graphql/storefront/schema.graphql`.

use graphql_client::GraphQLQuery;
use storecart_core::CheckoutLineItem;

// Custom scalars must be in scope of the derive and match the schema names.
#[allow(clippy::upper_case_acronyms)]
type URL = String;

// Product queries
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ProductVariantByHandle;

// Checkout mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/storefront/schema.graphql",
    query_path = "graphql/storefront/queries/checkout.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone"
)]
pub struct CheckoutCreate;

impl From<&CheckoutLineItem> for checkout_create::CheckoutLineItemInput {
    fn from(line: &CheckoutLineItem) -> Self {
        Self {
            variant_id: line.variant_id.clone(),
            quantity: i64::from(line.quantity),
        }
    }
}

/// Wire name of a checkout error code, e.g. `INVALID`.
pub fn error_code_name(code: &checkout_create::CheckoutErrorCode) -> Option<String> {
    serde_json::to_value(code)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
}
