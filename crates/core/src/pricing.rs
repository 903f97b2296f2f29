//! Pricing derivation: subtotal, tax, total and free-shipping progress.
//!
//! Everything here is a pure function of the line items and a
//! [`PricingPolicy`]. There is exactly one definition of each figure:
//! `total` always includes tax.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{CurrencyCode, LineItem, Money};

/// Flat tax rate applied to the subtotal (10%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Subtotal at which shipping becomes free (150.00).
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_minor(15_000);

/// Store-wide pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax, e.g. `0.10`.
    pub tax_rate: Decimal,
    /// Subtotal needed for free shipping.
    pub free_shipping_threshold: Money,
}

impl PricingPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(tax_rate: Decimal, free_shipping_threshold: Money) -> Self {
        Self {
            tax_rate,
            free_shipping_threshold,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_RATE, DEFAULT_FREE_SHIPPING_THRESHOLD)
    }
}

/// Sum of `price * quantity` over all lines. Zero for an empty cart.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// Tax on a subtotal, rounded half away from zero to whole cents.
#[must_use]
pub fn tax(subtotal: Money, rate: Decimal) -> Money {
    let amount = subtotal
        .to_decimal()
        .checked_mul(rate)
        .unwrap_or(Decimal::MAX);
    Money::from_decimal_rounded(amount)
}

/// Amount still needed to reach the free-shipping threshold, never negative.
#[must_use]
pub fn free_shipping_remaining(subtotal: Money, threshold: Money) -> Money {
    threshold.saturating_sub(subtotal).max(Money::ZERO)
}

/// Derived display figures for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub free_shipping_remaining: Money,
    pub qualifies_for_free_shipping: bool,
    /// Sum of line quantities.
    pub item_count: u64,
    /// Currency of the first line, or the default when the cart is empty.
    pub currency: CurrencyCode,
}

impl CartSummary {
    /// Derive the summary for a list of lines.
    #[must_use]
    pub fn derive(items: &[LineItem], policy: &PricingPolicy) -> Self {
        let subtotal = subtotal(items);
        let tax = tax(subtotal, policy.tax_rate);
        let remaining = free_shipping_remaining(subtotal, policy.free_shipping_threshold);

        Self {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
            free_shipping_remaining: remaining,
            qualifies_for_free_shipping: remaining.is_zero(),
            item_count: items.iter().map(|i| u64::from(i.quantity.get())).sum(),
            currency: items
                .first()
                .map(|i| i.currency.clone())
                .unwrap_or_default(),
        }
    }

    /// Customer-facing free shipping banner text.
    #[must_use]
    pub fn free_shipping_message(&self) -> String {
        if self.qualifies_for_free_shipping {
            "You are eligible for free shipping.".to_string()
        } else {
            format!(
                "Spend {} more and get free shipping!",
                self.currency.format(self.free_shipping_remaining)
            )
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{LineItemId, Quantity};

    fn line(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem::new(
            LineItemId::parse(id).unwrap(),
            Money::parse(price).unwrap(),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_default_tax_rate_is_ten_percent() {
        assert_eq!(DEFAULT_TAX_RATE.to_string(), "0.10");
    }

    #[test]
    fn test_subtotal_empty() {
        assert_eq!(subtotal(&[]), Money::ZERO);
    }

    #[test]
    fn test_subtotal_multiple_lines() {
        let items = [line("A", "10.00", 2), line("B", "19.99", 1)];
        assert_eq!(subtotal(&items).to_string(), "39.99");
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 39.99 * 0.10 = 3.999 -> 4.00
        assert_eq!(tax(Money::from_minor(3999), DEFAULT_TAX_RATE).to_string(), "4.00");
        // 0.05 * 0.10 = 0.005 -> 0.01
        assert_eq!(tax(Money::from_minor(5), DEFAULT_TAX_RATE).to_string(), "0.01");
    }

    #[test]
    fn test_free_shipping_remaining() {
        let remaining = free_shipping_remaining(
            Money::parse("120.00").unwrap(),
            Money::parse("150.00").unwrap(),
        );
        assert_eq!(remaining.to_string(), "30.00");
    }

    #[test]
    fn test_free_shipping_remaining_never_negative() {
        let remaining =
            free_shipping_remaining(Money::from_minor(20_000), DEFAULT_FREE_SHIPPING_THRESHOLD);
        assert_eq!(remaining, Money::ZERO);
    }

    #[test]
    fn test_summary_total_includes_tax() {
        let items = [line("A", "10.00", 3)];
        let summary = CartSummary::derive(&items, &PricingPolicy::default());
        assert_eq!(summary.subtotal.to_string(), "30.00");
        assert_eq!(summary.tax.to_string(), "3.00");
        assert_eq!(summary.total.to_string(), "33.00");
        assert_eq!(summary.item_count, 3);
        assert!(!summary.qualifies_for_free_shipping);
    }

    #[test]
    fn test_summary_at_threshold_qualifies() {
        let items = [line("A", "75.00", 2)];
        let summary = CartSummary::derive(&items, &PricingPolicy::default());
        assert!(summary.qualifies_for_free_shipping);
        assert_eq!(
            summary.free_shipping_message(),
            "You are eligible for free shipping."
        );
    }

    #[test]
    fn test_free_shipping_message_uses_currency_symbol() {
        let mut item = line("A", "120.00", 1);
        item.currency = CurrencyCode::parse("EUR").unwrap();
        let summary = CartSummary::derive(&[item], &PricingPolicy::default());
        assert_eq!(
            summary.free_shipping_message(),
            "Spend €30.00 more and get free shipping!"
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy::new(Decimal::ZERO, Money::from_minor(20_000));
        let summary = CartSummary::derive(&[line("A", "120.00", 1)], &policy);
        assert_eq!(summary.tax, Money::ZERO);
        assert_eq!(summary.free_shipping_remaining.to_string(), "80.00");
    }
}
