//! `proptest` strategies shared by the unit tests.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use crate::types::{LineItem, LineItemId, Money, Quantity};

/// Small id alphabet so generated sequences hit the merge path often.
const IDS: &[&str] = &["A", "B", "C", "D", "E"];

/// A line with a price up to 999.99 and quantity 1..=100.
pub fn line_item() -> impl Strategy<Value = LineItem> {
    (prop::sample::select(IDS), 0i64..=99_999, 1u32..=100).prop_map(|(id, minor, quantity)| {
        LineItem::new(
            LineItemId::parse(id).unwrap(),
            Money::from_minor(minor),
            Quantity::new(quantity).unwrap(),
        )
    })
}

/// Up to `max` lines, ids possibly repeating.
pub fn line_items(max: usize) -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item(), 0..=max)
}
