//! Checkout: turn a cart and a shipping form into a submitted order.
//!
//! The cart is cleared only after the server acknowledges the order. Any
//! failure before or during submission leaves the cart exactly as it was, so
//! the customer can fix the form or simply retry.

use core::future::Future;

use serde::{Deserialize, Serialize};

use crate::api::{CreateOrderRequest, CreateOrderResponse, PaymentInfo};
use crate::cart::Cart;
use crate::types::{OrderId, RequiredText, TextError};

/// Raw shipping form as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    /// Recipient name.
    pub name: String,
    /// Recipient phone.
    pub phone: String,
    /// Shipping address.
    pub address: String,
}

/// Validated shipping details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    /// Recipient name.
    pub name: RequiredText,
    /// Recipient phone.
    pub phone: RequiredText,
    /// Shipping address.
    pub address: RequiredText,
}

impl ShippingDetails {
    /// Validate the three required fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`TextError`] in form order (name, phone, address).
    pub fn parse(name: &str, phone: &str, address: &str) -> Result<Self, TextError> {
        Ok(Self {
            name: RequiredText::parse("name", name)?,
            phone: RequiredText::parse("phone", phone)?,
            address: RequiredText::parse("address", address)?,
        })
    }
}

impl TryFrom<&ShippingForm> for ShippingDetails {
    type Error = TextError;

    fn try_from(form: &ShippingForm) -> Result<Self, Self::Error> {
        Self::parse(&form.name, &form.phone, &form.address)
    }
}

/// Something that can submit an order, usually the HTTP client.
pub trait OrderGateway {
    /// Transport or server error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit the order and wait for the server's acknowledgment.
    fn submit_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<CreateOrderResponse, Self::Error>> + Send;
}

/// What the customer sees after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Assigned order ID.
    pub order_id: OrderId,
    /// How to pay.
    pub payment_info: PaymentInfo,
}

/// Reasons a checkout did not go through.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Nothing to order; no request was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// A required shipping field is missing; no request was sent.
    #[error("invalid shipping details: {0}")]
    Validation(#[from] TextError),

    /// The request failed in transit or the server rejected it.
    #[error("order submission failed: {0}")]
    Submission(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CheckoutError {
    /// Alert text shown to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "购物车是空的".to_string(),
            Self::Validation(err) => format!("请填写完整的收货信息: {err}"),
            Self::Submission(_) => "订单创建失败，请重试。".to_string(),
        }
    }
}

/// Build the order submission for `cart` and `details`.
#[must_use]
pub fn build_request(cart: &Cart, details: &ShippingDetails) -> CreateOrderRequest {
    CreateOrderRequest {
        name: details.name.as_str().to_owned(),
        phone: details.phone.as_str().to_owned(),
        address: details.address.as_str().to_owned(),
        total_amount: cart.total(),
        items: cart.order_lines(),
    }
}

/// Submit `cart` with `form` through `gateway`.
///
/// On success the cart is cleared and the confirmation returned. On any error
/// the cart is left untouched.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] if the cart has no lines
/// - [`CheckoutError::Validation`] if a shipping field is blank
/// - [`CheckoutError::Submission`] if the gateway fails
pub async fn submit_order<G: OrderGateway + Sync>(
    cart: &mut Cart,
    form: &ShippingForm,
    gateway: &G,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let details = ShippingDetails::try_from(form)?;
    let request = build_request(cart, &details);

    let response = gateway
        .submit_order(&request)
        .await
        .map_err(|e| CheckoutError::Submission(Box::new(e)))?;

    cart.clear();

    Ok(OrderConfirmation {
        order_id: response.order_id,
        payment_info: response.payment_info,
    })
}
