//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2023-07)
//! - `CART_TAX_RATE` - Flat tax rate as a fraction (default: 0.10)
//! - `CART_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 150.00)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use storecart_core::{Money, PricingPolicy};
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2023-07";

/// Issued Storefront tokens are 32 hex digits, so close to 4 bits per byte.
const MIN_TOKEN_ENTROPY: f64 = 3.3;

/// Fragments that show up in copied `.env.example` values. Matched lowercase.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Tax and free-shipping constants for cart summaries
    pub pricing: PricingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2023-07)
    pub api_version: String,
    /// Storefront API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host: IpAddr = parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port: u16 = parse_or("STOREFRONT_PORT", 3000)?;
        let base_url = require("STOREFRONT_BASE_URL")?;

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let pricing = pricing_from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            shopify,
            pricing,
            sentry_dsn: var("SENTRY_DSN"),
            sentry_environment: var("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    /// Load the Shopify section on its own (also used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store or token is missing, or the token
    /// looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            store: require("SHOPIFY_STORE")?,
            api_version: var("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            access_token: require_token("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?,
        })
    }

    /// GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store, self.api_version
        )
    }

    /// Returns the access token for request headers.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

fn pricing_from_env() -> Result<PricingPolicy, ConfigError> {
    let defaults = PricingPolicy::default();

    let tax_rate = var("CART_TAX_RATE")
        .map(|raw| parse_tax_rate(&raw).map_err(|msg| invalid("CART_TAX_RATE", msg)))
        .transpose()?
        .unwrap_or(defaults.tax_rate);

    let free_shipping_threshold = var("CART_FREE_SHIPPING_THRESHOLD")
        .map(|raw| Money::parse(&raw).map_err(|e| invalid("CART_FREE_SHIPPING_THRESHOLD", e)))
        .transpose()?
        .unwrap_or(defaults.free_shipping_threshold);

    Ok(PricingPolicy::new(tax_rate, free_shipping_threshold))
}

/// Parse a tax rate fraction in `[0, 1]`.
fn parse_tax_rate(raw: &str) -> Result<Decimal, String> {
    let rate = Decimal::from_str(raw.trim()).map_err(|e| e.to_string())?;
    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(format!("must be between 0 and 1 (got {rate})"));
    }
    Ok(rate)
}

// =============================================================================
// Environment access
// =============================================================================

/// A set, non-blank variable.
fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn require(key: &str) -> Result<String, ConfigError> {
    var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a variable, or fall back when it is unset.
fn parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(key).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e| invalid(key, e))
    })
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

// =============================================================================
// Token checks
// =============================================================================

/// Read a token and refuse values that are obviously not real.
fn require_token(key: &str) -> Result<SecretString, ConfigError> {
    let value = require(key)?;
    check_token(&value).map_err(|reason| ConfigError::InsecureSecret(key.to_string(), reason))?;
    Ok(SecretString::from(value))
}

fn check_token(token: &str) -> Result<(), String> {
    if let Some(marker) = placeholder_marker(token) {
        return Err(format!("appears to be a placeholder (contains '{marker}')"));
    }

    let entropy = byte_entropy(token.as_bytes());
    if entropy < MIN_TOKEN_ENTROPY {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_TOKEN_ENTROPY:.1}); use the token Shopify issued"
        ));
    }

    Ok(())
}

fn placeholder_marker(token: &str) -> Option<&'static str> {
    let lower = token.to_ascii_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .copied()
        .find(|marker| lower.contains(marker))
}

/// Shannon entropy of a byte string, in bits per byte.
#[allow(clippy::cast_precision_loss)]
fn byte_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &b in bytes {
        if let Some(n) = counts.get_mut(usize::from(b)) {
            *n += 1;
        }
    }

    let len = bytes.len() as f64;
    counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = n as f64 / len;
            -p * p.log2()
        })
        .sum()
}
