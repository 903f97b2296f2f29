//! Handler errors and how they turn into responses.
//!
//! Server-side failures are captured to Sentry before the response goes out.
//! Error bodies are JSON: `{"error": "..."}`, or `{"errors": [...]}` when
//! Shopify rejected checkout input field by field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storecart_core::{CartError, CheckoutError};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Message shown when the hosted checkout cannot be created.
pub const CHECKOUT_FAILED_MESSAGE: &str = "Failed to proceed to checkout. Please try again.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart input could not be turned into a line item.
    #[error("Invalid cart item: {0}")]
    Cart(#[from] CartError),

    /// Cart cannot be checked out as-is.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Creating the hosted checkout failed.
    #[error("Checkout failed: {0}")]
    CheckoutFailed(#[source] ShopifyError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Wrap a Shopify failure from checkout creation.
    ///
    /// Field-level rejections stay client errors; everything else is a
    /// failed checkout.
    #[must_use]
    pub fn from_checkout(err: ShopifyError) -> Self {
        match err {
            ShopifyError::UserErrors(_) => Self::Shopify(err),
            other => Self::CheckoutFailed(other),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Cart(_)
            | Self::Checkout(_)
            | Self::BadRequest(_)
            | Self::Shopify(ShopifyError::UserErrors(_)) => StatusCode::BAD_REQUEST,
            Self::Shopify(ShopifyError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Shopify(ShopifyError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Shopify(_) | Self::CheckoutFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// What the client gets to see. Upstream and internal details stay in
    /// the logs.
    fn public_body(&self) -> serde_json::Value {
        let message = match self {
            Self::Shopify(ShopifyError::UserErrors(errors)) => {
                return json!({ "errors": errors });
            }
            Self::Shopify(ShopifyError::NotFound(_)) => "Product not found".to_string(),
            Self::Shopify(_) => "External service error".to_string(),
            Self::CheckoutFailed(_) => CHECKOUT_FAILED_MESSAGE.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::BadRequest(_) => self.to_string(),
        };
        json!({ "error": message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request error");
        } else {
            tracing::debug!(error = %self, %status, "Client error");
        }

        (status, Json(self.public_body())).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Leave a Sentry breadcrumb for a shopper action, e.g.
/// `add_breadcrumb("cart", "Added item", Some(&[("id", "A")]))`.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let data = data
        .unwrap_or_default()
        .iter()
        .map(|(k, v)| ((*k).to_string(), serde_json::Value::from(*v)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::CheckoutUserError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Your cart is empty.");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::NotFound("x".to_string()))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::RateLimited(3))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Shopify(ShopifyError::UserError("x".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn test_checkout_failure_hides_details() {
        let err = AppError::from_checkout(ShopifyError::UserError("boom".to_string()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], CHECKOUT_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_checkout_user_errors_are_listed() {
        let err = AppError::from_checkout(ShopifyError::UserErrors(vec![CheckoutUserError {
            field: vec!["lineItems".to_string()],
            message: "Variant is invalid".to_string(),
            code: None,
        }]));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "Variant is invalid");
        assert_eq!(body["errors"][0]["field"][0], "lineItems");
    }
}
