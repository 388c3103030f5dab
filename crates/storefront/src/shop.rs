//! The shop service: owned state plus persistence.
//!
//! [`ShopService`] is the single owner of the customer's cart, wishlist,
//! discount state, and last order receipt. Every mutation re-serializes the
//! affected collection through [`LocalStore`], gated by a hydration flag:
//! until [`ShopService::hydrate`] has run, writes are skipped so the
//! default-empty state can never clobber the persisted copy.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use mono_core::cart::{CartItem, Changed, ShopState};
use mono_core::catalog::{self, Product};
use mono_core::checkout::{DiscountState, PromoOffer, Totals, compute_totals};
use mono_core::forms::SavedAddress;
use mono_core::order::{OrderReceipt, PaymentMethod};
use mono_core::types::{PriceError, ProductId};

use crate::storage::{LocalStore, StorageError, keys};

/// Errors from shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A catalog price string failed to parse while computing totals.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// The referenced product does not exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// An order was submitted with an empty cart.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,
}

#[derive(Debug, Default)]
struct Inner {
    state: ShopState,
    discount: DiscountState,
    last_receipt: Option<OrderReceipt>,
    hydrated: bool,
}

/// Single source of truth for cart, wishlist, and checkout state.
#[derive(Debug)]
pub struct ShopService {
    store: LocalStore,
    inner: Mutex<Inner>,
}

impl ShopService {
    /// Create a service over the given store. Call [`Self::hydrate`] before
    /// serving traffic.
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent across a panic in another handler; recover
        // the guard rather than poisoning the whole shop.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load persisted cart and wishlist, then enable persistence.
    ///
    /// Corrupt records are logged and replaced with empty state; the next
    /// mutation overwrites them.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures.
    pub fn hydrate(&self) -> Result<(), StorageError> {
        let cart = self.load_or_warn::<Vec<CartItem>>(keys::CART)?;
        let wishlist = self.load_or_warn::<Vec<Product>>(keys::WISHLIST)?;

        let mut inner = self.lock();
        if let Some(cart) = cart {
            inner.state.cart = cart;
        }
        if let Some(wishlist) = wishlist {
            inner.state.wishlist = wishlist;
        }
        inner.hydrated = true;
        tracing::info!(
            cart_lines = inner.state.cart.len(),
            wishlist_entries = inner.state.wishlist.len(),
            "shop state hydrated"
        );
        Ok(())
    }

    fn load_or_warn<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.store.load::<T>(key) {
            Ok(value) => Ok(value),
            Err(StorageError::Corrupt { key, source }) => {
                tracing::warn!("discarding corrupt record {key}: {source}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the collection a mutation touched. Skipped (with a debug log)
    /// until hydration completes.
    fn persist(&self, inner: &Inner, changed: Changed) -> Result<(), StorageError> {
        if !inner.hydrated {
            tracing::debug!("skipping persist before hydration");
            return Ok(());
        }
        match changed {
            Changed::Cart => self.store.save(keys::CART, &inner.state.cart),
            Changed::Wishlist => self.store.save(keys::WISHLIST, &inner.state.wishlist),
            Changed::Nothing => Ok(()),
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Current cart lines.
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.lock().state.cart.clone()
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub fn cart_open(&self) -> bool {
        self.lock().state.cart_open
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().state.item_count()
    }

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::ProductNotFound`] for an unknown id, or a
    /// storage error if persistence fails.
    pub fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
        color: Option<String>,
        silent: bool,
    ) -> Result<(), ShopError> {
        let product = catalog::find(product_id)
            .ok_or(ShopError::ProductNotFound(product_id))?
            .clone();

        let mut inner = self.lock();
        let changed = inner.state.add_to_cart(product, quantity, color, silent);
        self.persist(&inner, changed)?;
        Ok(())
    }

    /// Adjust a line's quantity by `delta` (floored at 1).
    ///
    /// # Errors
    ///
    /// Returns a storage error if persistence fails.
    pub fn update_quantity(&self, product_id: ProductId, delta: i32) -> Result<(), ShopError> {
        let mut inner = self.lock();
        let changed = inner.state.update_quantity(product_id, delta);
        self.persist(&inner, changed)?;
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persistence fails.
    pub fn remove_from_cart(&self, product_id: ProductId) -> Result<(), ShopError> {
        let mut inner = self.lock();
        let changed = inner.state.remove_from_cart(product_id);
        self.persist(&inner, changed)?;
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persistence fails.
    pub fn clear_cart(&self) -> Result<(), ShopError> {
        let mut inner = self.lock();
        let changed = inner.state.clear_cart();
        self.persist(&inner, changed)?;
        Ok(())
    }

    /// Show the cart panel.
    pub fn open_cart(&self) {
        self.lock().state.open_cart();
    }

    /// Hide the cart panel.
    pub fn close_cart(&self) {
        self.lock().state.close_cart();
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Current wishlist entries.
    #[must_use]
    pub fn wishlist(&self) -> Vec<Product> {
        self.lock().state.wishlist.clone()
    }

    /// Whether the wishlist contains this product.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.lock().state.is_in_wishlist(product_id)
    }

    /// Add a catalog product to the wishlist (idempotent).
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::ProductNotFound`] for an unknown id, or a
    /// storage error if persistence fails.
    pub fn add_to_wishlist(&self, product_id: ProductId) -> Result<(), ShopError> {
        let product = catalog::find(product_id)
            .ok_or(ShopError::ProductNotFound(product_id))?
            .clone();

        let mut inner = self.lock();
        let changed = inner.state.add_to_wishlist(product);
        self.persist(&inner, changed)?;
        Ok(())
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persistence fails.
    pub fn remove_from_wishlist(&self, product_id: ProductId) -> Result<(), ShopError> {
        let mut inner = self.lock();
        let changed = inner.state.remove_from_wishlist(product_id);
        self.persist(&inner, changed)?;
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Current discount state.
    #[must_use]
    pub fn discount(&self) -> DiscountState {
        self.lock().discount.clone()
    }

    /// Evaluate a discount code, returning the resulting state and, on
    /// rejection, the promotional recovery offer.
    pub fn apply_discount(&self, code: &str) -> (DiscountState, Option<PromoOffer>) {
        let mut inner = self.lock();
        let promo = inner.discount.apply_code(code);
        (inner.discount.clone(), promo)
    }

    /// Derive totals for the current cart and discount.
    ///
    /// # Errors
    ///
    /// Returns a price error if a catalog price string fails to parse.
    pub fn totals(&self) -> Result<Totals, ShopError> {
        let inner = self.lock();
        Ok(compute_totals(&inner.state.cart, inner.discount.fraction)?)
    }

    /// Product ids currently in the cart (for the checkout recommendation).
    #[must_use]
    pub fn cart_ids(&self) -> Vec<ProductId> {
        self.lock().state.cart_ids()
    }

    /// Finalize an order: snapshot the cart and totals, clear the cart,
    /// optionally persist the address, and remember the receipt for the
    /// confirmation view.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::EmptyCart`] when there is nothing to order, a
    /// price error if totals cannot be derived, or a storage error if
    /// persistence fails.
    pub fn place_order(
        &self,
        payment_method: PaymentMethod,
        email: String,
        address_to_save: Option<SavedAddress>,
    ) -> Result<OrderReceipt, ShopError> {
        let mut inner = self.lock();
        if inner.state.cart.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let totals = compute_totals(&inner.state.cart, inner.discount.fraction)?;

        // Snapshot before clearing: the cart is the source of the item list.
        let receipt =
            OrderReceipt::snapshot(payment_method, email, inner.state.cart.clone(), totals);

        let changed = inner.state.clear_cart();
        inner.discount = DiscountState::default();
        self.persist(&inner, changed)?;

        if let Some(address) = address_to_save {
            self.store.save(keys::SAVED_ADDRESS, &address)?;
        }

        tracing::info!(
            order_id = %receipt.id,
            items = receipt.items.len(),
            "order placed"
        );
        inner.last_receipt = Some(receipt.clone());
        Ok(receipt)
    }

    /// The receipt of the last order placed this session, if any.
    #[must_use]
    pub fn last_receipt(&self) -> Option<OrderReceipt> {
        self.lock().last_receipt.clone()
    }

    /// The persisted address record, for one-time form pre-fill.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be read.
    pub fn saved_address(&self) -> Result<Option<SavedAddress>, ShopError> {
        Ok(self.store.load(keys::SAVED_ADDRESS)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mono_core::forms::PayNowForm;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("mono-shop-{}", uuid::Uuid::new_v4()));
            Self(dir)
        }

        fn store(&self) -> LocalStore {
            LocalStore::open(&self.0).unwrap()
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn hydrated_service(tmp: &TempDir) -> ShopService {
        let service = ShopService::new(tmp.store());
        service.hydrate().unwrap();
        service
    }

    #[test]
    fn test_mutations_before_hydration_are_not_persisted() {
        let tmp = TempDir::new();
        let service = ShopService::new(tmp.store());

        service.add_to_cart(ProductId::new(1), 1, None, true).unwrap();
        assert!(!tmp.store().contains(keys::CART));
    }

    #[test]
    fn test_mutations_after_hydration_persist() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);

        service.add_to_cart(ProductId::new(1), 2, None, true).unwrap();
        assert!(tmp.store().contains(keys::CART));

        // A second service over the same directory sees the cart.
        let reloaded = hydrated_service(&tmp);
        assert_eq!(reloaded.item_count(), 2);
    }

    #[test]
    fn test_hydration_wins_over_default_empty_state() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        service.add_to_cart(ProductId::new(3), 1, None, true).unwrap();

        // New process: mutate before hydrating, then hydrate. The persisted
        // cart must survive.
        let second = ShopService::new(tmp.store());
        second.open_cart();
        second.close_cart();
        second.hydrate().unwrap();
        assert_eq!(second.cart().len(), 1);
    }

    #[test]
    fn test_corrupt_cart_record_falls_back_to_empty() {
        let tmp = TempDir::new();
        std::fs::create_dir_all(&tmp.0).unwrap();
        std::fs::write(tmp.0.join("mono_cart.json"), "][").unwrap();

        let service = ShopService::new(tmp.store());
        service.hydrate().unwrap();
        assert!(service.cart().is_empty());
    }

    #[test]
    fn test_add_unknown_product() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        let result = service.add_to_cart(ProductId::new(999), 1, None, true);
        assert!(matches!(result, Err(ShopError::ProductNotFound(_))));
    }

    #[test]
    fn test_wishlist_persists() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        service.add_to_wishlist(ProductId::new(4)).unwrap();

        let reloaded = hydrated_service(&tmp);
        assert!(reloaded.is_in_wishlist(ProductId::new(4)));
    }

    #[test]
    fn test_place_order_snapshots_then_clears() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        service.add_to_cart(ProductId::new(1), 2, None, true).unwrap();
        service.apply_discount("MONO2026");

        let receipt = service
            .place_order(PaymentMethod::PayNow, "jenny@example.com".to_owned(), None)
            .unwrap();

        // Receipt matches the cart immediately prior to submission
        assert_eq!(receipt.item_count(), 2);
        assert!(!receipt.totals.discount.is_zero());

        // Live cart is empty immediately after, and the empty state is
        // what's persisted
        assert!(service.cart().is_empty());
        let reloaded = hydrated_service(&tmp);
        assert!(reloaded.cart().is_empty());

        // Discount resets with the fresh cart
        assert_eq!(service.discount().fraction, Decimal::ZERO);

        // Confirmation view can read the receipt back
        assert_eq!(service.last_receipt().unwrap().id, receipt.id);
    }

    #[test]
    fn test_place_order_empty_cart() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        let result = service.place_order(PaymentMethod::PayNow, String::new(), None);
        assert!(matches!(result, Err(ShopError::EmptyCart)));
    }

    #[test]
    fn test_place_order_saves_address_when_opted_in() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        service.add_to_cart(ProductId::new(2), 1, None, true).unwrap();

        let form = PayNowForm {
            email: "jenny@example.com".to_owned(),
            cardholder_name: "Jenny Rosen".to_owned(),
            billing_address: "27 Fredrick Ave".to_owned(),
            city: "Los Angeles".to_owned(),
            zip: "94025".to_owned(),
            state: "California".to_owned(),
            country: "United States".to_owned(),
            ..PayNowForm::default()
        };
        let address = SavedAddress::from_pay_now(&form, Utc::now());

        service
            .place_order(
                PaymentMethod::PayNow,
                form.email.clone(),
                Some(address.clone()),
            )
            .unwrap();

        let saved = service.saved_address().unwrap().unwrap();
        assert_eq!(saved.address, "27 Fredrick Ave");
        assert_eq!(saved.first_name, "Jenny");
    }

    #[test]
    fn test_totals_follow_discount_state() {
        let tmp = TempDir::new();
        let service = hydrated_service(&tmp);
        // MONO ONE is $599
        service.add_to_cart(ProductId::new(1), 1, None, true).unwrap();

        let before = service.totals().unwrap();
        assert_eq!(before.discount, Decimal::ZERO);

        let (state, promo) = service.apply_discount("mono2026");
        assert!(state.is_applied());
        assert!(promo.is_none());

        let after = service.totals().unwrap();
        assert!(after.discount > Decimal::ZERO);
        assert!(after.total < before.total);
    }
}
