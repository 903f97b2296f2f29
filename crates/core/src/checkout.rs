//! Encoding a cart for the commerce backend's checkout.
//!
//! Two encodings are supported:
//! - A cart permalink, `https://{store}/cart/{variant}:{qty},.../checkout`,
//!   which takes numeric variant ids.
//! - Checkout line items (`{variantId, quantity}` with the full GID) for the
//!   checkout-creation mutation.

use serde::{Deserialize, Serialize};

use crate::types::{LineItem, LineItemId};

/// Errors building a checkout from cart lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Nothing to check out.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// A line has no usable backend variant reference.
    #[error("Cart item {id} has no product variant and cannot be checked out")]
    MissingVariant {
        /// Line without a variant.
        id: LineItemId,
    },

    /// The store domain is unusable for building URLs.
    #[error("Invalid store domain: {0:?}")]
    InvalidStoreDomain(String),
}

/// One line of a checkout-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    pub variant_id: String,
    pub quantity: u32,
}

/// Build checkout-creation line items, one per cart line.
///
/// # Errors
///
/// Returns `EmptyCart` for no lines, `MissingVariant` for a line without a
/// variant reference.
pub fn checkout_line_items(items: &[LineItem]) -> Result<Vec<CheckoutLineItem>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    items
        .iter()
        .map(|item| {
            let variant = item
                .variant_id
                .as_ref()
                .ok_or_else(|| CheckoutError::MissingVariant {
                    id: item.id.clone(),
                })?;
            Ok(CheckoutLineItem {
                variant_id: variant.as_str().to_owned(),
                quantity: item.quantity.get(),
            })
        })
        .collect()
}

/// Build the cart permalink that lands the shopper on the hosted checkout.
///
/// ```
/// use storecart_core::{cart_permalink, LineItem, LineItemId, Money, Quantity, VariantId};
///
/// let mut item = LineItem::new(
///     LineItemId::parse("A").unwrap(),
///     Money::parse("10.00").unwrap(),
///     Quantity::new(2).unwrap(),
/// );
/// item.variant_id = Some(VariantId::parse("gid://shopify/ProductVariant/123").unwrap());
///
/// let url = cart_permalink("shop.example.com", &[item]).unwrap();
/// assert_eq!(url, "https://shop.example.com/cart/123:2/checkout");
/// ```
///
/// # Errors
///
/// Returns `InvalidStoreDomain` for a blank or scheme-qualified domain,
/// `EmptyCart` for no lines, and `MissingVariant` when a line's variant
/// reference is absent or has no numeric id.
pub fn cart_permalink(store_domain: &str, items: &[LineItem]) -> Result<String, CheckoutError> {
    let domain = store_domain.trim().trim_end_matches('/');
    if domain.is_empty() || domain.contains("://") || domain.contains('/') {
        return Err(CheckoutError::InvalidStoreDomain(store_domain.to_owned()));
    }

    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let lines = items
        .iter()
        .map(|item| {
            item.variant_id
                .as_ref()
                .and_then(|v| v.numeric_id())
                .map(|numeric| format!("{numeric}:{}", item.quantity))
                .ok_or_else(|| CheckoutError::MissingVariant {
                    id: item.id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("https://{domain}/cart/{}/checkout", lines.join(",")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Money, Quantity, VariantId};

    fn line(id: &str, variant: Option<&str>, quantity: u32) -> LineItem {
        let mut item = LineItem::new(
            LineItemId::parse(id).unwrap(),
            Money::parse("1.00").unwrap(),
            Quantity::new(quantity).unwrap(),
        );
        item.variant_id = variant.map(|v| VariantId::parse(v).unwrap());
        item
    }

    #[test]
    fn test_permalink_joins_lines_in_order() {
        let items = [
            line("A", Some("gid://shopify/ProductVariant/11"), 2),
            line("B", Some("gid://shopify/ProductVariant/22"), 1),
        ];
        assert_eq!(
            cart_permalink("shop.example.com", &items).unwrap(),
            "https://shop.example.com/cart/11:2,22:1/checkout"
        );
    }

    #[test]
    fn test_permalink_empty_cart() {
        assert_eq!(
            cart_permalink("shop.example.com", &[]),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_permalink_missing_variant() {
        let items = [
            line("A", Some("gid://shopify/ProductVariant/11"), 1),
            line("B", None, 1),
        ];
        let err = cart_permalink("shop.example.com", &items).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::MissingVariant {
                id: LineItemId::parse("B").unwrap()
            }
        );
        assert!(err.to_string().contains("Cart item B"));
    }

    #[test]
    fn test_permalink_variant_without_numeric_id() {
        let items = [line("A", Some("gid://shopify/ProductVariant/"), 1)];
        assert!(matches!(
            cart_permalink("shop.example.com", &items),
            Err(CheckoutError::MissingVariant { .. })
        ));
    }

    #[test]
    fn test_permalink_rejects_scheme() {
        let items = [line("A", Some("1"), 1)];
        assert!(matches!(
            cart_permalink("https://shop.example.com", &items),
            Err(CheckoutError::InvalidStoreDomain(_))
        ));
    }

    #[test]
    fn test_checkout_line_items_keep_full_gid() {
        let items = [line("A", Some("gid://shopify/ProductVariant/11"), 3)];
        let lines = checkout_line_items(&items).unwrap();
        assert_eq!(
            lines,
            vec![CheckoutLineItem {
                variant_id: "gid://shopify/ProductVariant/11".to_string(),
                quantity: 3,
            }]
        );
        let json = serde_json::to_value(&lines).unwrap();
        assert_eq!(json[0]["variantId"], "gid://shopify/ProductVariant/11");
    }

    #[test]
    fn test_checkout_line_items_missing_variant() {
        assert!(matches!(
            checkout_line_items(&[line("A", None, 1)]),
            Err(CheckoutError::MissingVariant { .. })
        ));
    }
}
