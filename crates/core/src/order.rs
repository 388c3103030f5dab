//! Order receipt snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartItem;
use crate::checkout::Totals;

/// How the order was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PayNow,
    CashOnDelivery,
}

/// Immutable snapshot of the cart taken at the moment of successful
/// submission, decoupled from subsequent cart mutations.
///
/// Receipts live only for the current session; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: Uuid,
    pub payment_method: PaymentMethod,
    pub email: String,
    pub items: Vec<CartItem>,
    pub totals: Totals,
    pub placed_at: DateTime<Utc>,
}

impl OrderReceipt {
    /// Snapshot the given cart lines and totals.
    ///
    /// Callers must take this snapshot *before* clearing the cart, since
    /// the cart is the source of the item list.
    #[must_use]
    pub fn snapshot(
        payment_method: PaymentMethod,
        email: String,
        items: Vec<CartItem>,
        totals: Totals,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payment_method,
            email,
            items,
            totals,
            placed_at: Utc::now(),
        }
    }

    /// Total number of units on the receipt.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
