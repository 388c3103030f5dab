//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Products
//! GET  /products                - Product listing (?category=, ?featured=true)
//! GET  /products/{id}           - Product detail (404 body carries an escape hatch)
//!
//! # Cart
//! GET  /cart                    - Cart view (items, count, totals, panel flag)
//! GET  /cart/count              - Unit count only
//! POST /cart/add                - Add a product (merges by id, opens panel unless silent)
//! POST /cart/update             - Adjust a line quantity by delta (floored at 1)
//! POST /cart/remove             - Remove a line
//! POST /cart/clear              - Empty the cart
//! POST /cart/open               - Show the cart panel
//! POST /cart/close              - Hide the cart panel
//!
//! # Wishlist
//! GET  /wishlist                - Wishlist view
//! POST /wishlist/add            - Add a product (idempotent)
//! POST /wishlist/remove         - Remove a product
//! GET  /wishlist/contains/{id}  - Membership check
//!
//! # Checkout
//! GET  /checkout                         - Totals + discount state + recommendation
//! POST /checkout/discount                - Evaluate a discount code
//! POST /checkout/card-meta               - Card brand detection + formatting
//! POST /checkout/validate/pay-now        - Validate the card form (no side effects)
//! POST /checkout/validate/cash-on-delivery - Validate the COD form
//! POST /checkout/pay-now                 - Submit the card form (422 when invalid)
//! POST /checkout/cash-on-delivery        - Submit the COD form
//! GET  /checkout/saved-address           - Persisted address for form pre-fill
//! GET  /checkout/confirmation            - Receipt of the last order this session
//! ```

pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/contains/{id}", get(wishlist::contains))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/discount", post(checkout::apply_discount))
        .route("/card-meta", post(checkout::card_meta))
        .route("/validate/pay-now", post(checkout::validate_pay_now))
        .route(
            "/validate/cash-on-delivery",
            post(checkout::validate_cash_on_delivery),
        )
        .route("/pay-now", post(checkout::submit_pay_now))
        .route("/cash-on-delivery", post(checkout::submit_cash_on_delivery))
        .route("/saved-address", get(checkout::saved_address))
        .route("/confirmation", get(checkout::confirmation))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/checkout", checkout_routes())
}
