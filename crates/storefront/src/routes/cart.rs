//! Cart route handlers.
//!
//! Every mutation responds with the refreshed cart view so the client can
//! re-render without a second round trip.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use mono_core::cart::CartItem;
use mono_core::catalog::{self, Product};
use mono_core::checkout::Totals;
use mono_core::types::{Price, ProductId, price::format_usd};

use crate::error::Result;
use crate::shop::ShopError;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub color: String,
    pub quantity: u32,
    /// Unit price as authored in the catalog (e.g. `"$699"`).
    pub price: String,
    /// Unit price × quantity, display-rounded.
    pub line_price: String,
    pub image: String,
}

impl CartItemView {
    pub(crate) fn build(item: &CartItem) -> std::result::Result<Self, ShopError> {
        let unit = Price::parse(&item.product.price).map_err(ShopError::from)?;
        let line_price = unit.amount() * rust_decimal::Decimal::from(item.quantity);

        Ok(Self {
            id: item.id(),
            name: item.product.name.clone(),
            color: item.color.clone(),
            quantity: item.quantity,
            price: item.product.price.clone(),
            line_price: format_usd(line_price),
            image: item.product.image.clone(),
        })
    }
}

/// Derived totals, display-rounded to cents.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub subtotal: String,
    pub discount: String,
    /// `"Free"` when zero, which in this storefront is always.
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        Self {
            subtotal: format_usd(totals.subtotal),
            discount: format_usd(totals.discount),
            shipping: if totals.shipping.is_zero() {
                "Free".to_owned()
            } else {
                format_usd(totals.shipping)
            },
            tax: format_usd(totals.tax),
            total: format_usd(totals.total),
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub is_open: bool,
    pub totals: TotalsView,
    /// Upsell slot: first catalog product not already in the cart.
    pub recommendation: Option<Product>,
}

/// Build the cart view from the current shop state.
pub fn cart_view(state: &AppState) -> Result<CartView> {
    let shop = state.shop();
    let items = shop
        .cart()
        .iter()
        .map(CartItemView::build)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(CartView {
        items,
        item_count: shop.item_count(),
        is_open: shop.cart_open(),
        totals: shop.totals()?.into(),
        recommendation: recommendation(state),
    })
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub color: Option<String>,
    pub silent: Option<bool>,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub product_id: ProductId,
    /// Signed adjustment; the resulting quantity is floored at 1.
    pub delta: i32,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Display the cart.
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    Ok(Json(cart_view(&state)?))
}

/// Unit count badge.
pub async fn count(State(state): State<AppState>) -> Json<CartCountResponse> {
    Json(CartCountResponse {
        count: state.shop().item_count(),
    })
}

/// Add an item to the cart.
///
/// Merges with an existing line for the same product id. Opens the cart
/// panel unless `silent`.
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    state.shop().add_to_cart(
        req.product_id,
        req.quantity.unwrap_or(1),
        req.color,
        req.silent.unwrap_or(false),
    )?;
    Ok(Json(cart_view(&state)?))
}

/// Adjust a line quantity by a signed delta, floored at 1.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    state.shop().update_quantity(req.product_id, req.delta)?;
    Ok(Json(cart_view(&state)?))
}

/// Remove a line from the cart.
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    state.shop().remove_from_cart(req.product_id)?;
    Ok(Json(cart_view(&state)?))
}

/// Empty the cart.
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    state.shop().clear_cart()?;
    Ok(Json(cart_view(&state)?))
}

/// Show the cart panel.
pub async fn open(State(state): State<AppState>) -> Result<Json<CartView>> {
    state.shop().open_cart();
    Ok(Json(cart_view(&state)?))
}

/// Hide the cart panel.
pub async fn close(State(state): State<AppState>) -> Result<Json<CartView>> {
    state.shop().close_cart();
    Ok(Json(cart_view(&state)?))
}

/// Pick a product to recommend alongside the cart: the first catalog
/// product not already in it.
#[must_use]
pub fn recommendation(state: &AppState) -> Option<Product> {
    catalog::recommend_for(&state.shop().cart_ids()).cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mono_core::cart::ShopState;
    use rust_decimal::Decimal;

    #[test]
    fn test_line_price_multiplies_quantity() {
        let mut state = ShopState::new();
        let product = catalog::find(ProductId::new(1)).unwrap().clone();
        state.add_to_cart(product, 3, None, true);

        let view = CartItemView::build(state.cart.first().unwrap()).unwrap();
        assert_eq!(view.price, "$599");
        assert_eq!(view.line_price, "$1797.00");
    }

    #[test]
    fn test_zero_shipping_displays_as_free() {
        let totals = Totals {
            subtotal: Decimal::new(200, 0),
            discount: Decimal::ZERO,
            shipping: Decimal::ZERO,
            tax: Decimal::new(16, 0),
            total: Decimal::new(216, 0),
        };

        let view = TotalsView::from(totals);
        assert_eq!(view.shipping, "Free");
        assert_eq!(view.total, "$216.00");
    }
}
