//! The cart store: authoritative line items for one browsing session.
//!
//! A [`CartStore`] hydrates itself once from its [`CartPersistence`] and then
//! treats the slot as write-only: every mutation rewrites the whole cart
//! before returning, so memory and storage agree whenever the store is at
//! rest. Save failures are logged, never returned.
//!
//! # Example
//!
//! ```rust
//! use storecart_core::{CartPersistence, CartStore, LineItem, LineItemId, MemorySlot, Money, Quantity};
//!
//! let mut cart = CartStore::hydrate(CartPersistence::new(MemorySlot::new()));
//! let id = LineItemId::parse("A").unwrap();
//!
//! cart.add_item(LineItem::new(id.clone(), Money::parse("10.00").unwrap(), Quantity::new(2).unwrap()));
//! cart.add_item(LineItem::new(id, Money::parse("10.00").unwrap(), Quantity::ONE));
//!
//! assert_eq!(cart.items()[0].quantity.get(), 3);
//! assert_eq!(cart.subtotal().to_string(), "30.00");
//! ```

use tracing::{debug, warn};

use crate::persistence::{CartPersistence, KeyValueSlot};
use crate::pricing::{self, CartSummary, PricingPolicy};
use crate::types::{LineItem, Money, Quantity};

/// Observable cart states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    Empty,
    Populated,
}

/// Cart line items plus the slot they are mirrored to.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<LineItem>,
    persistence: CartPersistence<S>,
    policy: PricingPolicy,
}

impl<S: KeyValueSlot> CartStore<S> {
    /// Build a store from whatever the slot currently holds.
    ///
    /// Stored lines sharing an id are merged so the uniqueness invariant holds
    /// even for hand-edited or legacy values.
    pub fn hydrate(persistence: CartPersistence<S>) -> Self {
        let mut store = Self {
            items: Vec::new(),
            persistence,
            policy: PricingPolicy::default(),
        };
        store.reload();
        store
    }

    /// Use `policy` for tax and shipping figures.
    #[must_use]
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Discard in-memory lines and hydrate again from storage.
    pub fn reload(&mut self) {
        let stored = self.persistence.load();
        self.items = Vec::with_capacity(stored.len());
        for item in stored {
            self.merge(item);
        }
    }

    /// Add a line, or add its quantity to the existing line with the same id.
    ///
    /// On merge the existing line keeps its title, price and other fields;
    /// only the quantity changes.
    pub fn add_item(&mut self, item: LineItem) {
        debug!(id = %item.id, quantity = %item.quantity, "Adding cart line");
        self.merge(item);
        self.persist();
    }

    /// Set a line's quantity, clamped to at least 1.
    ///
    /// Unknown ids are ignored.
    pub fn update_item_quantity(&mut self, id: &str, quantity: i64) {
        let Some(line) = self.items.iter_mut().find(|i| i.id.as_str() == id) else {
            debug!(id, "Quantity update for unknown cart line ignored");
            return;
        };
        line.quantity = Quantity::clamped(quantity);
        self.persist();
    }

    /// Remove the line with `id`, if present.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id.as_str() != id);
        self.persist();
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        if self.items.is_empty() {
            CartState::Empty
        } else {
            CartState::Populated
        }
    }

    /// Sum of `price * quantity`; zero when empty.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        pricing::subtotal(&self.items)
    }

    /// Subtotal plus tax under the store's pricing policy.
    #[must_use]
    pub fn total(&self) -> Money {
        self.summary().total
    }

    /// All derived figures under the store's pricing policy.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::derive(&self.items, &self.policy)
    }

    /// Returns the persistence adapter.
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Consumes the store and returns its slot.
    pub fn into_slot(self) -> S {
        self.persistence.into_slot()
    }

    fn merge(&mut self, item: LineItem) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.items) {
            warn!(error = %e, lines = self.items.len(), "Failed to persist cart");
        }
    }
}
