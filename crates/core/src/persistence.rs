//! Cart persistence: a durable mirror of the line item collection.
//!
//! The cart lives in a single key-value slot under [`CART_STORAGE_KEY`] as a
//! JSON array of line items. Where that slot physically lives is up to the
//! [`KeyValueSlot`] implementation: a browser session, a local file, memory.
//!
//! Loading fails soft. A missing, unreadable or malformed value is an empty
//! cart. Saving returns a `Result` so callers can log failures, but nothing
//! retries.

use tracing::{debug, warn};

use crate::types::LineItem;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors from reading or writing a slot.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart or the storage container could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store rejected the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single durable string value.
pub trait KeyValueSlot {
    /// Read the stored value, `None` when nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    fn write(&mut self, value: &str) -> Result<(), StorageError>;
}

/// In-memory slot.
///
/// Used for tests and by request handlers that shuttle the raw value to and
/// from a session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Create a slot holding a previously stored value.
    #[must_use]
    pub const fn with_value(value: Option<String>) -> Self {
        Self { value }
    }

    /// Returns the stored value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Consumes the slot and returns the stored value.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        self.value
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        self.value = Some(value.to_owned());
        Ok(())
    }
}

/// Serializes the cart into a [`KeyValueSlot`].
#[derive(Debug, Clone, Default)]
pub struct CartPersistence<S> {
    slot: S,
}

impl<S: KeyValueSlot> CartPersistence<S> {
    /// Wrap a slot.
    pub const fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Load the stored lines in their stored order.
    ///
    /// Never fails: absent, unreadable and malformed values all load as an
    /// empty cart. When the value is an array, lines that do not parse (say
    /// a legacy price like `"10.005"`) are skipped and the rest are kept.
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored cart, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, starting empty");
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Stored cart is malformed, starting empty");
                return Vec::new();
            }
        };

        let stored = entries.len();
        let items: Vec<LineItem> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value(entry)
                    .inspect_err(|e| warn!(index, error = %e, "Skipping unreadable cart line"))
                    .ok()
            })
            .collect();

        debug!(
            lines = items.len(),
            skipped = stored - items.len(),
            "Loaded stored cart"
        );
        items
    }

    /// Serialize `items` and overwrite the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    pub fn save(&mut self, items: &[LineItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.slot.write(&raw)
    }

    /// Returns the underlying slot.
    pub const fn slot(&self) -> &S {
        &self.slot
    }

    /// Consumes the adapter and returns the underlying slot.
    pub fn into_slot(self) -> S {
        self.slot
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::strategies;
    use crate::types::{CurrencyCode, LineImage, LineItemId, Money, Quantity, VariantId};

    fn line(id: &str, price: &str, quantity: u32) -> LineItem {
        LineItem::new(
            LineItemId::parse(id).unwrap(),
            Money::parse(price).unwrap(),
            Quantity::new(quantity).unwrap(),
        )
    }

    #[test]
    fn test_load_absent_is_empty() {
        let persistence = CartPersistence::new(MemorySlot::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let slot = MemorySlot::with_value(Some("{not json".to_string()));
        assert!(CartPersistence::new(slot).load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let slot = MemorySlot::with_value(Some(r#"{"id":"A"}"#.to_string()));
        assert!(CartPersistence::new(slot).load().is_empty());
    }

    #[test]
    fn test_load_skips_unreadable_lines() {
        let slot = MemorySlot::with_value(Some(
            r#"[
                {"id":"A","quantity":1,"price":"NaN","currency":"USD"},
                {"id":"B","quantity":2,"price":"4.50","currency":"USD"},
                {"id":"C","quantity":1,"price":"10.005","currency":"USD"},
                "not a line",
                {"id":"D","quantity":1,"price":"1.00","currency":"usd!"}
            ]"#
            .to_string(),
        ));
        let loaded = CartPersistence::new(slot).load();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.first().unwrap().id.as_str(), "B");
        assert_eq!(loaded.first().unwrap().quantity.get(), 2);
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let mut first = line("B", "19.99", 1);
        first.variant_id = Some(VariantId::parse("gid://shopify/ProductVariant/2").unwrap());
        first.currency = CurrencyCode::parse("EUR").unwrap();
        first.image = Some(LineImage {
            url: "https://cdn.example/b.jpg".to_string(),
            alt_text: None,
        });
        let items = vec![first, line("A", "10.00", 3)];

        let mut persistence = CartPersistence::new(MemorySlot::new());
        persistence.save(&items).unwrap();
        assert_eq!(persistence.load(), items);
    }

    #[test]
    fn test_round_trip_empty() {
        let mut persistence = CartPersistence::new(MemorySlot::new());
        persistence.save(&[]).unwrap();
        assert_eq!(persistence.slot().value(), Some("[]"));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_overwrites() {
        let mut persistence = CartPersistence::new(MemorySlot::new());
        persistence.save(&[line("A", "1.00", 1)]).unwrap();
        persistence.save(&[line("B", "2.00", 1)]).unwrap();
        let loaded = persistence.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.first().unwrap().id.as_str(), "B");
    }

    proptest! {
        #[test]
        fn test_save_load_round_trip_any_lines(items in strategies::line_items(12)) {
            let mut persistence = CartPersistence::new(MemorySlot::new());
            persistence.save(&items).unwrap();
            prop_assert_eq!(persistence.load(), items);
        }
    }
}
