//! JSON payloads exchanged between the storefront server and its clients.
//!
//! Field names follow the public HTTP contract, which mixes `snake_case`
//! request bodies with a `camelCase` order confirmation.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::Order;
use crate::types::{OrderId, OrderStatus, Price, ProductId};

/// `{id, quantity}` line inside an order submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    /// Product to order.
    pub id: ProductId,
    /// Units to order; must be at least one.
    pub quantity: u32,
}

/// Body of `POST /api/orders`.
///
/// Text fields and `items` default to empty when absent so that a missing
/// field surfaces as a validation error naming the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Recipient name.
    #[serde(default)]
    pub name: String,
    /// Recipient phone.
    #[serde(default)]
    pub phone: String,
    /// Shipping address.
    #[serde(default)]
    pub address: String,
    /// Total as computed by the client.
    pub total_amount: Price,
    /// Ordered lines.
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

/// Static payment instructions returned after checkout.
///
/// There is no payment gateway: the customer transfers money by hand and an
/// admin marks the order paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Payment method, e.g. `bank_transfer`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable account description.
    pub account: String,
    /// Text the customer must put in the transfer memo.
    #[serde(default)]
    pub reference: String,
}

/// Response of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Assigned order ID.
    pub order_id: OrderId,
    /// Confirmation message.
    pub message: String,
    /// How to pay.
    pub payment_info: PaymentInfo,
}

/// Body of `POST /api/admin/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    /// Admin username.
    #[serde(default)]
    pub username: String,
    /// Admin password.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for AdminLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminLoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /api/admin/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    /// Logged-in admin username.
    pub username: String,
    /// Bearer token for admin endpoints.
    pub token: String,
    /// When the token stops working.
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AdminLoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminLoginResponse")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// An order as listed on the admin desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOrderView {
    /// The stored order.
    #[serde(flatten)]
    pub order: Order,
    /// Display label of the current status for the order table.
    pub status_label: String,
    /// The only status the admin may move this order to.
    pub next_status: Option<OrderStatus>,
}

impl From<Order> for AdminOrderView {
    fn from(order: Order) -> Self {
        let status_label = order.status.label().to_string();
        let next_status = order.status.next();
        Self {
            order,
            status_label,
            next_status,
        }
    }
}

/// Body of `PUT /api/admin/orders/{id}`.
///
/// `status` stays a plain string at the boundary so unknown values produce a
/// readable 400 instead of a deserializer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Requested status.
    pub status: String,
}

/// Response of `PUT /api/admin/orders/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    /// Always `true` on a 2xx response.
    pub success: bool,
    /// Updated order.
    pub id: OrderId,
    /// New status.
    pub status: OrderStatus,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Client-safe message.
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::order::OrderLineSnapshot;

    #[test]
    fn test_create_order_response_is_camel_case() {
        let response = CreateOrderResponse {
            order_id: OrderId::new(9),
            message: "Order created".to_string(),
            payment_info: PaymentInfo {
                kind: "bank_transfer".to_string(),
                account: "CMB 1234".to_string(),
                reference: "#9".to_string(),
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["orderId"], 9);
        assert_eq!(value["paymentInfo"]["type"], "bank_transfer");
        assert_eq!(value["paymentInfo"]["account"], "CMB 1234");
    }

    #[test]
    fn test_create_order_request_missing_fields_default_empty() {
        let request: CreateOrderRequest =
            serde_json::from_str(r#"{"total_amount": 200, "items": [{"id": 1, "quantity": 2}]}"#)
                .unwrap();
        assert!(request.name.is_empty());
        assert!(request.phone.is_empty());
        assert_eq!(request.items.len(), 1);
    }

    #[test]
    fn test_login_debug_redacts_password() {
        let request = AdminLoginRequest {
            username: "admin".to_string(),
            password: "hunter2-very-secret".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_admin_order_view_flattens_and_offers_next() {
        let order = Order {
            id: OrderId::new(1),
            customer_name: "A".to_string(),
            phone: "1".to_string(),
            address: "X".to_string(),
            total_amount: Price::from_cents(100),
            status: OrderStatus::Paid,
            created_at: Utc::now(),
            items: vec![OrderLineSnapshot {
                id: ProductId::new(1),
                title: "Tiara".to_string(),
                unit_price: Price::from_cents(100),
                quantity: 1,
            }],
        };

        let view = AdminOrderView::from(order);
        assert_eq!(view.next_status, Some(OrderStatus::Shipped));

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["customer_name"], "A");
        assert_eq!(value["status"], "paid");
        assert_eq!(value["next_status"], "shipped");
        assert_eq!(value["status_label"], "已付款");

        let back: AdminOrderView = serde_json::from_value(value).unwrap();
        assert_eq!(back, view);
    }
}
