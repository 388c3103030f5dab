//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are authored as display strings (`"$699"`, `"$1,299"`).
//! [`Price::parse`] strips the currency symbol and thousands separators and
//! keeps the value as a [`Decimal`] so that totals never accumulate binary
//! floating-point error. Rounding to two decimal places happens only when a
//! value is formatted for display.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is empty after stripping formatting.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a valid decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The price is negative.
    #[error("price cannot be negative: {0}")]
    Negative(String),
}

/// A unit price in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a raw decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Parse a price from a currency-formatted string.
    ///
    /// Accepts a leading `$` and thousands separators: `"$1,299"`,
    /// `"$699"`, and `"450.50"` all parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the remaining text is empty, not a decimal
    /// number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let cleaned: String = s
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount: Decimal = cleaned
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;

        if amount.is_sign_negative() {
            return Err(PriceError::Negative(s.to_owned()));
        }

        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_usd(self.0))
    }
}

/// Format a decimal amount as a USD display string with two decimal places.
///
/// This is the single point where monetary values are rounded; internal
/// arithmetic keeps full precision.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
