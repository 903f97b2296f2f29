//! Cart commands: edit and inspect the cart stored in a local file.

use storecart_core::{CartPersistence, CartStore, KeyValueSlot, LineItem, LineItemInput, Quantity};

/// Open the cart held by `slot`.
pub fn open<S: KeyValueSlot>(slot: S) -> CartStore<S> {
    CartStore::hydrate(CartPersistence::new(slot))
}

/// Add an item, merging with an existing line of the same id.
///
/// # Errors
///
/// Returns an error if the input is not a valid line item.
pub fn add<S: KeyValueSlot>(
    cart: &mut CartStore<S>,
    input: LineItemInput,
) -> Result<(), Box<dyn std::error::Error>> {
    let item = LineItem::try_from(input)?;
    tracing::info!(id = %item.id, quantity = %item.quantity, "Adding item");
    cart.add_item(item);
    Ok(())
}

/// Set a line's quantity from raw input; unknown ids are reported.
pub fn update<S: KeyValueSlot>(cart: &mut CartStore<S>, id: &str, quantity: &str) {
    if cart.get(id).is_none() {
        tracing::warn!("No cart item with id {id}");
        return;
    }
    let quantity = Quantity::from_input(quantity);
    tracing::info!(id, %quantity, "Updating quantity");
    cart.update_item_quantity(id, i64::from(quantity.get()));
}

/// Remove a line.
pub fn remove<S: KeyValueSlot>(cart: &mut CartStore<S>, id: &str) {
    if cart.get(id).is_none() {
        tracing::warn!("No cart item with id {id}");
        return;
    }
    tracing::info!(id, "Removing item");
    cart.remove_item(id);
}

/// Remove every line.
pub fn clear<S: KeyValueSlot>(cart: &mut CartStore<S>) {
    tracing::info!(lines = cart.len(), "Clearing cart");
    cart.clear_cart();
}

/// Render the cart as text.
#[must_use]
pub fn render<S: KeyValueSlot>(cart: &CartStore<S>) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let summary = cart.summary();
    let currency = &summary.currency;
    let mut out = String::new();

    for line in cart.items() {
        let title = if line.title.is_empty() {
            line.id.as_str()
        } else {
            line.title.as_str()
        };
        out.push_str(&format!(
            "{:<12} {:<32} x{:<4} {:>12} {:>12}\n",
            line.id.as_str(),
            title,
            line.quantity.get(),
            line.currency.format(line.price),
            line.currency.format(line.line_total()),
        ));
    }

    out.push('\n');
    out.push_str(&format!("Subtotal: {}\n", currency.format(summary.subtotal)));
    out.push_str(&format!("Tax:      {}\n", currency.format(summary.tax)));
    out.push_str(&format!("Total:    {}\n", currency.format(summary.total)));
    out.push_str(&summary.free_shipping_message());
    out.push('\n');
    out
}

/// Render the cart and its summary as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json<S: KeyValueSlot>(
    cart: &CartStore<S>,
) -> Result<String, serde_json::Error> {
    let summary = cart.summary();
    serde_json::to_string_pretty(&serde_json::json!({
        "items": cart.items(),
        "summary": summary,
        "freeShippingMessage": summary.free_shipping_message(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storecart_core::MemorySlot;

    fn input(id: &str, price: &str, quantity: &str) -> LineItemInput {
        LineItemInput {
            id: id.to_string(),
            title: format!("Item {id}"),
            price: price.to_string(),
            quantity: Some(quantity.to_string()),
            ..LineItemInput::default()
        }
    }

    #[test]
    fn test_add_merges_and_persists() {
        let mut cart = open(MemorySlot::new());
        add(&mut cart, input("A", "10.00", "2")).unwrap();
        add(&mut cart, input("A", "10.00", "1")).unwrap();

        let reopened = open(cart.into_slot());
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.item_count(), 3);
        assert_eq!(reopened.subtotal().to_string(), "30.00");
    }

    #[test]
    fn test_add_rejects_bad_price() {
        let mut cart = open(MemorySlot::new());
        assert!(add(&mut cart, input("A", "ten", "1")).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_clamps_input() {
        let mut cart = open(MemorySlot::new());
        add(&mut cart, input("A", "10.00", "3")).unwrap();

        update(&mut cart, "A", "0");
        assert_eq!(cart.item_count(), 1);

        update(&mut cart, "A", "abc");
        assert_eq!(cart.item_count(), 1);

        update(&mut cart, "A", "4.7");
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = open(MemorySlot::new());
        add(&mut cart, input("A", "1.00", "1")).unwrap();
        add(&mut cart, input("B", "2.00", "1")).unwrap();

        remove(&mut cart, "A");
        assert!(cart.get("A").is_none());
        assert_eq!(cart.len(), 1);

        clear(&mut cart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_render_lists_totals() {
        let mut cart = open(MemorySlot::new());
        add(&mut cart, input("A", "120.00", "1")).unwrap();

        let text = render(&cart);
        assert!(text.contains("Item A"));
        assert!(text.contains("Subtotal: $120.00"));
        assert!(text.contains("Tax:      $12.00"));
        assert!(text.contains("Total:    $132.00"));
        assert!(text.contains("Spend $30.00 more and get free shipping!"));
    }

    #[test]
    fn test_render_empty() {
        let cart = open(MemorySlot::new());
        assert_eq!(render(&cart), "Your cart is empty.\n");
    }

    #[test]
    fn test_render_json() {
        let mut cart = open(MemorySlot::new());
        add(&mut cart, input("A", "10.00", "3")).unwrap();

        let json: serde_json::Value = serde_json::from_str(&render_json(&cart).unwrap()).unwrap();
        assert_eq!(json["items"][0]["id"], "A");
        assert_eq!(json["summary"]["total"], "33.00");
    }
}
