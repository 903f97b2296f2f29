//! Cart route handlers.
//!
//! The cart lives in the session as the same JSON array the CLI writes to
//! disk. Each request hydrates a `CartStore` from it, applies one operation,
//! and writes the result back. Mutations return the updated cart along with
//! an HTMX trigger so badges elsewhere on the page can refresh.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use storecart_core::{
    CartPersistence, CartState, CartStore, CartSummary, LineItem, LineItemInput, MemorySlot,
    Money, Quantity, VariantId, cart_permalink,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;

/// Header telling HTMX listeners the cart changed.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line with its derived total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    #[serde(flatten)]
    pub line: LineItem,
    pub line_total: Money,
}

/// Cart contents plus pricing, as returned by every cart endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    #[serde(flatten)]
    pub summary: CartSummary,
    pub free_shipping_message: String,
    pub is_empty: bool,
}

impl CartView {
    /// Snapshot a cart for display.
    #[must_use]
    pub fn from_store(cart: &CartStore<MemorySlot>) -> Self {
        let summary = cart.summary();
        Self {
            items: cart
                .items()
                .iter()
                .map(|line| CartItemView {
                    line_total: line.line_total(),
                    line: line.clone(),
                })
                .collect(),
            free_shipping_message: summary.free_shipping_message(),
            summary,
            is_empty: cart.state() == CartState::Empty,
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: u64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Build the shopper's cart from the session.
///
/// A session read failure is treated like an absent cart.
pub(crate) async fn load_cart(state: &AppState, session: &Session) -> CartStore<MemorySlot> {
    let raw = session
        .get::<String>(session_keys::CART)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read cart from session: {e}");
            None
        });

    CartStore::hydrate(CartPersistence::new(MemorySlot::with_value(raw)))
        .with_policy(state.config().pricing)
}

/// Write the cart back to the session.
///
/// Failures are logged; the response still reflects the in-memory cart.
async fn commit_cart(session: &Session, cart: CartStore<MemorySlot>) {
    let Some(raw) = cart.into_slot().into_value() else {
        return;
    };

    if let Err(e) = session.insert(session_keys::CART, raw).await {
        tracing::warn!("Failed to save cart to session: {e}");
    }
}

/// Respond with the updated cart and the HTMX trigger.
fn updated(view: CartView) -> Response {
    (AppendHeaders([CART_UPDATED_TRIGGER]), Json(view)).into_response()
}

// =============================================================================
// Forms
// =============================================================================

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    /// Raw quantity input; non-numeric or below 1 becomes 1.
    #[serde(default)]
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let cart = load_cart(&state, &session).await;
    Json(CartView::from_store(&cart))
}

/// Get cart count badge data.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Json<CartCount> {
    let cart = load_cart(&state, &session).await;
    Json(CartCount {
        count: cart.item_count(),
    })
}

/// Add an item to the cart.
///
/// When the form carries only a product handle, the handle's first variant
/// is looked up so the line can be checked out later.
#[instrument(skip_all, fields(id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(mut form): Form<LineItemInput>,
) -> Result<Response> {
    let has_variant = form
        .variant_id
        .as_deref()
        .is_some_and(|v| !v.trim().is_empty());

    if !has_variant {
        let handle = form.handle.trim();
        if handle.is_empty() {
            return Err(AppError::BadRequest(
                "Cart item needs a variant_id or a product handle".to_string(),
            ));
        }
        let variant: VariantId = state.storefront().fetch_variant_id(handle).await?;
        form.variant_id = Some(variant.into_inner());
    }

    let item = LineItem::try_from(form)?;
    add_breadcrumb("cart", "Added item", Some(&[("id", item.id.as_str())]));

    let mut cart = load_cart(&state, &session).await;
    cart.add_item(item);
    let view = CartView::from_store(&cart);
    commit_cart(&session, cart).await;

    Ok(updated(view))
}

/// Update a line's quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let quantity = Quantity::from_input(&form.quantity);

    let mut cart = load_cart(&state, &session).await;
    cart.update_item_quantity(&form.id, i64::from(quantity.get()));
    let view = CartView::from_store(&cart);
    commit_cart(&session, cart).await;

    updated(view)
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    add_breadcrumb("cart", "Removed item", Some(&[("id", form.id.as_str())]));

    let mut cart = load_cart(&state, &session).await;
    cart.remove_item(&form.id);
    let view = CartView::from_store(&cart);
    commit_cart(&session, cart).await;

    updated(view)
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let mut cart = load_cart(&state, &session).await;
    cart.clear_cart();
    let view = CartView::from_store(&cart);
    commit_cart(&session, cart).await;

    updated(view)
}

/// Redirect to Shopify checkout via a cart permalink.
///
/// The cart is left as it is; it is not cleared on hand-off.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let cart = load_cart(&state, &session).await;
    let url = cart_permalink(&state.config().shopify.store, cart.items())?;

    tracing::info!(lines = cart.len(), "Redirecting to checkout");
    Ok(Redirect::to(&url))
}
