//! Cart and wishlist state machine.
//!
//! [`ShopState`] is the single source of truth for what the customer has
//! selected. It owns no I/O; the storefront service persists the affected
//! collection after each mutation.
//!
//! Invariants:
//! - At most one cart line per product id; adding an existing product
//!   increments its quantity.
//! - Line quantity is always >= 1. `update_quantity` floors at 1; only
//!   `remove_from_cart` deletes a line.
//! - At most one wishlist entry per product id.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

/// Default variant color for cart lines.
pub const DEFAULT_COLOR: &str = "Standard";

/// A product selected for purchase, with quantity and variant color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    pub color: String,
}

impl CartItem {
    /// The product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Which collection a mutation touched, so the caller knows what to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Changed {
    Cart,
    Wishlist,
    /// UI-only change (cart panel visibility); nothing to persist.
    Nothing,
}

/// In-memory cart, wishlist, and cart panel visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    pub cart: Vec<CartItem>,
    pub wishlist: Vec<Product>,
    #[serde(skip)]
    pub cart_open: bool,
}

impl ShopState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product to the cart.
    ///
    /// If a line with the same product id exists, its quantity is
    /// incremented by `quantity`; otherwise a new line is appended. Opens
    /// the cart panel unless `silent`.
    pub fn add_to_cart(
        &mut self,
        product: Product,
        quantity: u32,
        color: Option<String>,
        silent: bool,
    ) -> Changed {
        let quantity = quantity.max(1);

        if let Some(existing) = self.cart.iter_mut().find(|item| item.id() == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.cart.push(CartItem {
                product,
                quantity,
                color: color.unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            });
        }

        if !silent {
            self.open_cart();
        }
        Changed::Cart
    }

    /// Remove a line from the cart. No-op if absent.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Changed {
        self.cart.retain(|item| item.id() != product_id);
        Changed::Cart
    }

    /// Empty the cart (used after a successful order).
    pub fn clear_cart(&mut self) -> Changed {
        self.cart.clear();
        Changed::Cart
    }

    /// Adjust a line's quantity by `delta`, floored at 1.
    ///
    /// The quantity can never drop below 1 through this operation; use
    /// [`Self::remove_from_cart`] to delete the line. No-op if absent.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i32) -> Changed {
        if let Some(item) = self.cart.iter_mut().find(|item| item.id() == product_id) {
            let current = i64::from(item.quantity);
            let updated = current.saturating_add(i64::from(delta)).max(1);
            item.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        }
        Changed::Cart
    }

    /// Add a product to the wishlist. Idempotent.
    pub fn add_to_wishlist(&mut self, product: Product) -> Changed {
        if !self.is_in_wishlist(product.id) {
            self.wishlist.push(product);
        }
        Changed::Wishlist
    }

    /// Remove a product from the wishlist. No-op if absent.
    pub fn remove_from_wishlist(&mut self, product_id: ProductId) -> Changed {
        self.wishlist.retain(|p| p.id != product_id);
        Changed::Wishlist
    }

    /// Whether the wishlist contains this product.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.wishlist.iter().any(|p| p.id == product_id)
    }

    /// Show the cart panel.
    pub const fn open_cart(&mut self) -> Changed {
        self.cart_open = true;
        Changed::Nothing
    }

    /// Hide the cart panel.
    pub const fn close_cart(&mut self) -> Changed {
        self.cart_open = false;
        Changed::Nothing
    }

    /// Total number of units across all cart lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.iter().map(|item| item.quantity).sum()
    }

    /// Product ids currently in the cart, in line order.
    #[must_use]
    pub fn cart_ids(&self) -> Vec<ProductId> {
        self.cart.iter().map(CartItem::id).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;

    fn product(id: i32) -> Product {
        catalog::find(ProductId::new(id)).unwrap().clone()
    }

    #[test]
    fn test_add_merges_by_product_id() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        state.add_to_cart(product(1), 2, None, true);
        state.add_to_cart(product(1), 3, None, true);

        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart.first().unwrap().quantity, 6);
    }

    #[test]
    fn test_add_distinct_products() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        state.add_to_cart(product(2), 1, None, true);

        assert_eq!(state.cart.len(), 2);
        assert_eq!(state.item_count(), 2);
    }

    #[test]
    fn test_add_opens_cart_unless_silent() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        assert!(!state.cart_open);

        state.add_to_cart(product(2), 1, None, false);
        assert!(state.cart_open);
    }

    #[test]
    fn test_add_defaults_color() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        state.add_to_cart(product(2), 1, Some("Midnight".to_owned()), true);

        assert_eq!(state.cart.first().unwrap().color, "Standard");
        assert_eq!(state.cart.get(1).unwrap().color, "Midnight");
    }

    #[test]
    fn test_update_quantity_floors_at_one() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 2, None, true);

        state.update_quantity(ProductId::new(1), -1);
        assert_eq!(state.cart.first().unwrap().quantity, 1);

        state.update_quantity(ProductId::new(1), -100);
        assert_eq!(state.cart.first().unwrap().quantity, 1);

        state.update_quantity(ProductId::new(1), 4);
        assert_eq!(state.cart.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 2, None, true);
        state.update_quantity(ProductId::new(999), 3);
        assert_eq!(state.cart.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_then_add_is_fresh() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 5, None, true);
        state.remove_from_cart(ProductId::new(1));
        assert!(state.cart.is_empty());

        state.add_to_cart(product(1), 2, None, true);
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.cart.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        state.remove_from_cart(ProductId::new(999));
        assert_eq!(state.cart.len(), 1);
    }

    #[test]
    fn test_clear_cart() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 1, None, true);
        state.add_to_cart(product(2), 1, None, true);
        state.clear_cart();
        assert!(state.cart.is_empty());
        assert_eq!(state.item_count(), 0);
    }

    #[test]
    fn test_wishlist_add_is_idempotent() {
        let mut state = ShopState::new();
        state.add_to_wishlist(product(3));
        state.add_to_wishlist(product(3));

        assert_eq!(state.wishlist.len(), 1);
        assert!(state.is_in_wishlist(ProductId::new(3)));
    }

    #[test]
    fn test_wishlist_remove() {
        let mut state = ShopState::new();
        state.add_to_wishlist(product(3));
        state.remove_from_wishlist(ProductId::new(3));

        assert!(state.wishlist.is_empty());
        assert!(!state.is_in_wishlist(ProductId::new(3)));
    }

    #[test]
    fn test_open_close_cart() {
        let mut state = ShopState::new();
        assert_eq!(state.open_cart(), Changed::Nothing);
        assert!(state.cart_open);
        state.close_cart();
        assert!(!state.cart_open);
    }

    #[test]
    fn test_cart_serde_roundtrip_flattens_product() {
        let mut state = ShopState::new();
        state.add_to_cart(product(1), 2, None, true);

        let json = serde_json::to_string(&state.cart).unwrap();
        // Product fields sit alongside quantity/color, matching the
        // persisted record shape.
        assert!(json.contains("\"name\":\"MONO ONE\""));
        assert!(json.contains("\"quantity\":2"));

        let parsed: Vec<CartItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state.cart);
    }
}
