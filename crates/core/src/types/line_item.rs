//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::{IdError, LineItemId, VariantId};
use super::price::{CurrencyCode, CurrencyError, Money, PriceError};
use super::quantity::Quantity;

/// Errors raised while turning raw input into a [`LineItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The line id is missing.
    #[error("line item id cannot be empty")]
    EmptyId,
    /// The price string is not a valid amount.
    #[error("invalid price format: {0}")]
    InvalidPriceFormat(#[from] PriceError),
    /// The currency is not an ISO 4217 code.
    #[error("invalid currency: {0}")]
    InvalidCurrency(#[from] CurrencyError),
}

impl From<IdError> for CartError {
    fn from(_: IdError) -> Self {
        Self::EmptyId
    }
}

/// Product image shown next to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// One line of the cart.
///
/// The serialized form is the stored cart format: camelCase keys, price as a
/// decimal string, e.g.
///
/// ```json
/// {"id":"A","variantId":"gid://shopify/ProductVariant/1","title":"Yoga Mat",
///  "handle":"yoga-mat","quantity":2,"price":"29.99","currency":"EUR"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub quantity: Quantity,
    pub price: Money,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<LineImage>,
}

impl LineItem {
    /// Create a line with the given id, unit price and quantity.
    ///
    /// Remaining fields start empty; set them directly.
    #[must_use]
    pub fn new(id: LineItemId, price: Money, quantity: Quantity) -> Self {
        Self {
            id,
            variant_id: None,
            title: String::new(),
            handle: String::new(),
            quantity,
            price,
            currency: CurrencyCode::default(),
            image: None,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity.get())
    }
}

/// Unvalidated line item fields, as submitted by a form or command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemInput {
    pub id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub quantity: Option<String>,
    pub price: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
}

impl TryFrom<LineItemInput> for LineItem {
    type Error = CartError;

    fn try_from(input: LineItemInput) -> Result<Self, Self::Error> {
        let id = LineItemId::parse(&input.id)?;
        let price = Money::parse(&input.price)?;
        let currency = match non_blank(input.currency) {
            Some(code) => CurrencyCode::parse(&code)?,
            None => CurrencyCode::default(),
        };
        let quantity = input
            .quantity
            .as_deref()
            .map_or(Quantity::ONE, Quantity::from_input);
        let variant_id = non_blank(input.variant_id)
            .map(|v| VariantId::parse(&v))
            .transpose()?;
        let image = non_blank(input.image_url).map(|url| LineImage {
            url,
            alt_text: non_blank(input.image_alt),
        });

        Ok(Self {
            id,
            variant_id,
            title: input.title,
            handle: input.handle,
            quantity,
            price,
            currency,
            image,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
