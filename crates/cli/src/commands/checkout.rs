//! Checkout commands: hand the local cart over to Shopify.

use storecart_core::{CartStore, KeyValueSlot, cart_permalink, checkout_line_items};
use storecart_storefront::config::ShopifyStorefrontConfig;
use storecart_storefront::shopify::StorefrontClient;

/// Environment variable naming the store domain for permalinks.
const STORE_ENV: &str = "SHOPIFY_STORE";

/// Build the cart permalink for `store`, or `SHOPIFY_STORE` when absent.
///
/// # Errors
///
/// Returns an error if no store is known, or the cart is empty or has a
/// line without a variant.
pub fn permalink<S: KeyValueSlot>(
    cart: &CartStore<S>,
    store: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let store = match store {
        Some(store) => store,
        None => {
            dotenvy::dotenv().ok();
            std::env::var(STORE_ENV).map_err(|_| format!("{STORE_ENV} not set (or pass --store)"))?
        }
    };

    Ok(cart_permalink(&store, cart.items())?)
}

/// Create a hosted checkout through the Storefront API.
///
/// Reads `SHOPIFY_STORE`, `SHOPIFY_API_VERSION` and
/// `SHOPIFY_STOREFRONT_ACCESS_TOKEN`. The cart is left unchanged.
///
/// # Errors
///
/// Returns an error if configuration is missing, the cart cannot be checked
/// out, or Shopify rejects the request.
pub async fn create<S: KeyValueSlot>(
    cart: &CartStore<S>,
) -> Result<String, Box<dyn std::error::Error>> {
    let line_items = checkout_line_items(cart.items())?;

    let config = ShopifyStorefrontConfig::from_env()?;
    tracing::info!(store = %config.store, lines = line_items.len(), "Creating checkout");

    let client = StorefrontClient::new(&config);
    let checkout = client.create_checkout(&line_items).await?;

    Ok(checkout.web_url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storecart_core::{LineItemInput, MemorySlot};

    use crate::commands::cart;

    #[test]
    fn test_permalink_with_explicit_store() {
        let mut store = cart::open(MemorySlot::new());
        cart::add(
            &mut store,
            LineItemInput {
                id: "A".to_string(),
                variant_id: Some("gid://shopify/ProductVariant/77".to_string()),
                price: "5.00".to_string(),
                quantity: Some("2".to_string()),
                ..LineItemInput::default()
            },
        )
        .unwrap();

        let url = permalink(&store, Some("shop.example.com".to_string())).unwrap();
        assert_eq!(url, "https://shop.example.com/cart/77:2/checkout");
    }

    #[test]
    fn test_permalink_empty_cart() {
        let store = cart::open(MemorySlot::new());
        let err = permalink(&store, Some("shop.example.com".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "Your cart is empty.");
    }
}
