//! Persisted order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price, ProductId};

/// One line of the item snapshot stored with an order.
///
/// Captured at checkout time so later catalog edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    /// Product that was ordered.
    pub id: ProductId,
    /// Product title at checkout time.
    pub title: String,
    /// Unit price at checkout time.
    pub unit_price: Price,
    /// Units ordered.
    pub quantity: u32,
}

impl OrderLineSnapshot {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A checkout submission as stored and shown to admins.
///
/// Contains the customer's phone and address, so it is only ever returned by
/// admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned ID.
    pub id: OrderId,
    /// Recipient name.
    pub customer_name: String,
    /// Recipient phone.
    pub phone: String,
    /// Shipping address.
    pub address: String,
    /// Order total, recomputed by the server at creation.
    pub total_amount: Price,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Snapshot of what was ordered.
    pub items: Vec<OrderLineSnapshot>,
}

impl Order {
    /// The one-line "name phone address" text admins copy onto a waybill.
    #[must_use]
    pub fn shipping_label(&self) -> String {
        format!("{} {} {}", self.customer_name, self.phone, self.address)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .map(|line| line.quantity)
            .fold(0, u32::saturating_add)
    }
}
