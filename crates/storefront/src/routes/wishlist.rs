//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use mono_core::catalog::Product;
use mono_core::types::ProductId;

use crate::error::Result;
use crate::state::AppState;

/// Wishlist display data.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

/// Wishlist mutation request.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// Membership check response.
#[derive(Debug, Serialize)]
pub struct ContainsResponse {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

fn wishlist_view(state: &AppState) -> WishlistView {
    let items = state.shop().wishlist();
    WishlistView {
        count: items.len(),
        items,
    }
}

/// Display the wishlist.
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    Json(wishlist_view(&state))
}

/// Add a product to the wishlist. Adding twice is a no-op.
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<WishlistRequest>,
) -> Result<Json<WishlistView>> {
    state.shop().add_to_wishlist(req.product_id)?;
    Ok(Json(wishlist_view(&state)))
}

/// Remove a product from the wishlist.
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<WishlistRequest>,
) -> Result<Json<WishlistView>> {
    state.shop().remove_from_wishlist(req.product_id)?;
    Ok(Json(wishlist_view(&state)))
}

/// Check whether a product is wishlisted.
pub async fn contains(State(state): State<AppState>, Path(id): Path<i32>) -> Json<ContainsResponse> {
    let product_id = ProductId::new(id);
    Json(ContainsResponse {
        product_id,
        in_wishlist: state.shop().is_in_wishlist(product_id),
    })
}
