//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Implements `graphql_client::GraphQLQuery` for each operation we send
//! - Shopify owns products and checkouts; the cart itself stays local
//! - In-memory caching via `moka` for handle lookups (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use storecart_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! // Resolve the variant to add for a product page
//! let variant = client.fetch_variant_id("my-product").await?;
//!
//! // Hand the cart over to Shopify's hosted checkout
//! let url = client.create_checkout(&checkout_line_items(cart.items())?).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Mutation returned no result and no explanation.
    #[error("User error: {0}")]
    UserError(String),

    /// Mutation rejected its input.
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<CheckoutUserError>),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// Error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }

    fn is_blank(&self) -> bool {
        self.message.is_empty() && self.path.is_empty() && self.locations.is_empty()
    }
}

/// Renders `message path: a.0.b at line L:C`, skipping absent parts.
impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";

        if !self.message.is_empty() {
            f.write_str(&self.message)?;
            sep = " ";
        }

        if !self.path.is_empty() {
            f.write_str(sep)?;
            f.write_str("path: ")?;
            for (i, segment) in self.path.iter().enumerate() {
                if i > 0 {
                    f.write_str(".")?;
                }
                match segment {
                    serde_json::Value::String(key) => f.write_str(key)?,
                    other => write!(f, "{other}")?,
                }
            }
            sep = " ";
        }

        if let Some(loc) = self.locations.first() {
            write!(f, "{sep}at line {}:{}", loc.line, loc.column)?;
        }

        Ok(())
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            if e.is_blank() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                e.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[CheckoutUserError]) -> String {
    errors
        .iter()
        .map(|e| {
            if e.field.is_empty() {
                e.message.clone()
            } else {
                format!("{} ({})", e.message, e.field.join("."))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 2, column: 7 }],
            path: vec![
                serde_json::Value::String("checkoutCreate".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: checkoutCreate.0 at line 2:7"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = ShopifyError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_user_errors_display() {
        let err = ShopifyError::UserErrors(vec![
            CheckoutUserError {
                field: vec!["input".to_string(), "lineItems".to_string()],
                message: "Variant is invalid".to_string(),
                code: Some("INVALID".to_string()),
            },
            CheckoutUserError {
                field: vec![],
                message: "Checkout is locked".to_string(),
                code: None,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "User errors: Variant is invalid (input.lineItems); Checkout is locked"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
