//! Order totals derivation and discount codes.
//!
//! Totals are a pure function of (cart lines, discount fraction) and are
//! recomputed on demand; nothing here is cached. All arithmetic stays in
//! [`Decimal`] at full precision; display rounding happens in
//! [`crate::types::price::format_usd`].
//!
//! The formulas are fixed storefront policy, not a configurable pricing
//! engine: shipping is always free, tax is a flat 8% applied after the
//! discount, and exactly one discount code exists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{Price, PriceError};

/// The only accepted discount code, compared case-insensitively.
pub const VALID_DISCOUNT_CODE: &str = "MONO2026";

/// Fraction taken off the subtotal when the code is applied (10%).
pub const DISCOUNT_FRACTION: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Flat tax rate applied after the discount (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Derived monetary breakdown for the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Totals for an empty cart.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Compute totals from cart lines and the applied discount fraction.
///
/// - `subtotal = Σ unit_price × quantity`
/// - `discount = subtotal × fraction`
/// - `shipping = 0`
/// - `tax = (subtotal − discount) × 8%`
/// - `total = subtotal − discount + shipping + tax`
///
/// # Errors
///
/// Returns a [`PriceError`] if any line's price string fails to parse.
pub fn compute_totals(cart: &[CartItem], discount_fraction: Decimal) -> Result<Totals, PriceError> {
    let mut subtotal = Decimal::ZERO;
    for item in cart {
        let unit = Price::parse(&item.product.price)?.amount();
        subtotal += unit * Decimal::from(item.quantity);
    }

    let discount = subtotal * discount_fraction;
    let shipping = Decimal::ZERO;
    let tax = (subtotal - discount) * TAX_RATE;
    let total = subtotal - discount + shipping + tax;

    Ok(Totals {
        subtotal,
        discount,
        shipping,
        tax,
        total,
    })
}

/// A promotional offer surfaced when a discount code is rejected, giving the
/// customer the code that would have worked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoOffer {
    pub code: String,
    pub message: String,
}

impl PromoOffer {
    fn current() -> Self {
        Self {
            code: VALID_DISCOUNT_CODE.to_owned(),
            message: format!("Try code {VALID_DISCOUNT_CODE} for 10% off your order."),
        }
    }
}

/// Discount code state: either an applied fraction or a rejection message,
/// never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountState {
    /// The code as entered, kept for display once applied.
    pub code: Option<String>,
    /// Applied discount fraction; zero when no valid code is applied.
    #[serde(default)]
    pub fraction: Decimal,
    /// Rejection message for the last attempted code.
    pub error: Option<String>,
}

impl DiscountState {
    /// Evaluate a user-entered discount code.
    ///
    /// A match (case-insensitive, surrounding whitespace ignored) applies
    /// the 10% fraction and clears any error. A miss resets the fraction to
    /// zero, records an error, and returns a [`PromoOffer`] as the recovery
    /// path.
    pub fn apply_code(&mut self, input: &str) -> Option<PromoOffer> {
        let entered = input.trim();

        if entered.eq_ignore_ascii_case(VALID_DISCOUNT_CODE) {
            self.code = Some(VALID_DISCOUNT_CODE.to_owned());
            self.fraction = DISCOUNT_FRACTION;
            self.error = None;
            None
        } else {
            self.code = None;
            self.fraction = Decimal::ZERO;
            self.error = Some(format!("Code \"{entered}\" is not valid."));
            Some(PromoOffer::current())
        }
    }

    /// Whether a discount is currently applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !self.fraction.is_zero()
    }
}
