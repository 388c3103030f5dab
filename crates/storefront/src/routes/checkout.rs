//! Checkout route handlers.
//!
//! Validation endpoints are side-effect free and meant to be called on
//! every form change; the client keeps its submit control inert while
//! `valid` is false. Submission re-validates server-side and answers 422
//! with the same field-keyed error map when the gate fails.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mono_core::catalog::Product;
use mono_core::checkout::PromoOffer;
use mono_core::forms::{
    CardBrand, CashOnDeliveryForm, FieldErrors, PayNowForm, SavedAddress, detect_card_brand,
    format_card_number,
};
use mono_core::order::{OrderReceipt, PaymentMethod};

use crate::error::{AppError, Result};
use crate::routes::cart::{CartItemView, TotalsView, recommendation};
use crate::shop::ShopError;
use crate::state::AppState;

/// Discount code display state.
#[derive(Debug, Serialize)]
pub struct DiscountView {
    pub code: Option<String>,
    pub applied: bool,
    pub error: Option<String>,
}

/// Checkout page data: order summary plus discount state.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: TotalsView,
    pub discount: DiscountView,
    /// Upsell slot: first catalog product not already in the cart.
    pub recommendation: Option<Product>,
}

/// Discount code request.
#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub code: String,
}

/// Result of evaluating a discount code.
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub applied: bool,
    pub error: Option<String>,
    /// Recovery offer surfaced when the code was rejected.
    pub promo: Option<PromoOffer>,
    pub totals: TotalsView,
}

/// Card number metadata request (sent per keystroke).
#[derive(Debug, Deserialize)]
pub struct CardMetaRequest {
    pub card_number: String,
}

/// Issuer classification and display formatting for a card number.
#[derive(Debug, Serialize)]
pub struct CardMetaResponse {
    /// Detected issuer, or `null` when no prefix matches.
    pub brand: Option<CardBrand>,
    /// Digits regrouped into blocks of four.
    pub formatted: String,
}

/// Validation outcome for either form variant.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: FieldErrors,
}

/// Receipt display data.
#[derive(Debug, Serialize)]
pub struct ReceiptView {
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    pub email: String,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: TotalsView,
    pub placed_at: DateTime<Utc>,
}

impl ReceiptView {
    fn build(receipt: &OrderReceipt) -> std::result::Result<Self, ShopError> {
        let items = receipt
            .items
            .iter()
            .map(CartItemView::build)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            order_id: receipt.id,
            payment_method: receipt.payment_method,
            email: receipt.email.clone(),
            item_count: receipt.item_count(),
            items,
            totals: receipt.totals.into(),
            placed_at: receipt.placed_at,
        })
    }
}

/// Display checkout: order summary, totals, and discount state.
pub async fn show(State(state): State<AppState>) -> Result<Json<CheckoutView>> {
    let shop = state.shop();
    let items = shop
        .cart()
        .iter()
        .map(CartItemView::build)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let discount = shop.discount();

    Ok(Json(CheckoutView {
        items,
        item_count: shop.item_count(),
        totals: shop.totals()?.into(),
        discount: DiscountView {
            applied: discount.is_applied(),
            code: discount.code,
            error: discount.error,
        },
        recommendation: recommendation(&state),
    }))
}

/// Evaluate a discount code.
///
/// A rejected code is a recoverable state, not a request failure: the
/// response is 200 with `error` and `promo` set and the fraction reset.
pub async fn apply_discount(
    State(state): State<AppState>,
    Json(req): Json<DiscountRequest>,
) -> Result<Json<DiscountResponse>> {
    let (discount, promo) = state.shop().apply_discount(&req.code);

    Ok(Json(DiscountResponse {
        applied: discount.is_applied(),
        error: discount.error,
        promo,
        totals: state.shop().totals()?.into(),
    }))
}

/// Classify and format a card number. No side effects.
pub async fn card_meta(Json(req): Json<CardMetaRequest>) -> Json<CardMetaResponse> {
    Json(CardMetaResponse {
        brand: detect_card_brand(&req.card_number),
        formatted: format_card_number(&req.card_number),
    })
}

/// Validate the pay-now form without submitting.
pub async fn validate_pay_now(Json(form): Json<PayNowForm>) -> Json<ValidationResponse> {
    let errors = form.validate();
    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    })
}

/// Validate the cash-on-delivery form without submitting.
pub async fn validate_cash_on_delivery(
    Json(form): Json<CashOnDeliveryForm>,
) -> Json<ValidationResponse> {
    let errors = form.validate();
    Json(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    })
}

fn unprocessable(errors: FieldErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationResponse {
            valid: false,
            errors,
        }),
    )
        .into_response()
}

/// Submit the pay-now form.
///
/// Re-validates server-side; an invalid form answers 422 with the field
/// error map. On success the cart is snapshotted into a receipt and
/// cleared, and the address is persisted when `saveAddress` was checked.
pub async fn submit_pay_now(
    State(state): State<AppState>,
    Json(form): Json<PayNowForm>,
) -> Result<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(unprocessable(errors));
    }

    let address = form
        .save_address
        .then(|| SavedAddress::from_pay_now(&form, Utc::now()));

    let receipt = state
        .shop()
        .place_order(PaymentMethod::PayNow, form.email.trim().to_owned(), address)?;

    Ok(Json(ReceiptView::build(&receipt)?).into_response())
}

/// Submit the cash-on-delivery form.
pub async fn submit_cash_on_delivery(
    State(state): State<AppState>,
    Json(form): Json<CashOnDeliveryForm>,
) -> Result<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(unprocessable(errors));
    }

    let address = form
        .save_address
        .then(|| SavedAddress::from_cash_on_delivery(&form, Utc::now()));

    let receipt = state.shop().place_order(
        PaymentMethod::CashOnDelivery,
        form.email.trim().to_owned(),
        address,
    )?;

    Ok(Json(ReceiptView::build(&receipt)?).into_response())
}

/// The persisted address record, applied by clients once on mount before
/// any user edits.
pub async fn saved_address(State(state): State<AppState>) -> Result<Json<SavedAddress>> {
    state
        .shop()
        .saved_address()?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no saved address".to_owned()))
}

/// Receipt of the last order placed this session.
pub async fn confirmation(State(state): State<AppState>) -> Result<Json<ReceiptView>> {
    let receipt = state
        .shop()
        .last_receipt()
        .ok_or_else(|| AppError::NotFound("no order has been placed".to_owned()))?;
    Ok(Json(ReceiptView::build(&receipt)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mono_core::cart::ShopState;
    use mono_core::catalog;
    use mono_core::checkout::compute_totals;
    use mono_core::types::ProductId;
    use rust_decimal::Decimal;

    #[test]
    fn test_receipt_view_totals_are_display_formatted() {
        let mut state = ShopState::new();
        let product = catalog::find(ProductId::new(3)).unwrap().clone();
        state.add_to_cart(product, 1, None, true);

        let totals = compute_totals(&state.cart, Decimal::ZERO).unwrap();
        let receipt = OrderReceipt::snapshot(
            PaymentMethod::CashOnDelivery,
            "jenny@example.com".to_owned(),
            state.cart,
            totals,
        );

        let view = ReceiptView::build(&receipt).unwrap();
        assert_eq!(view.item_count, 1);
        // MONO LITE $299 + 8% tax
        assert_eq!(view.totals.total, "$322.92");
        assert_eq!(view.totals.shipping, "Free");
    }

    #[test]
    fn test_card_brand_serializes_lowercase() {
        let response = CardMetaResponse {
            brand: detect_card_brand("4111 1111 1111 1111"),
            formatted: format_card_number("4111111111111111"),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["brand"], "visa");
        assert_eq!(json["formatted"], "4111 1111 1111 1111");
    }
}
