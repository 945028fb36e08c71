//! Crown Shop Client - HTTP client for the storefront API.
//!
//! - [`ShopClient`] - catalog reads and order submission; implements
//!   [`OrderGateway`](crown_shop_core::checkout::OrderGateway) so it can drive
//!   [`checkout::submit_order`](crown_shop_core::checkout::submit_order)
//! - [`AdminClient`] - login, order desk and status updates with implicit
//!   logout on 401
//!
//! # Example
//!
//! ```rust,ignore
//! use crown_shop_client::ShopClient;
//! use crown_shop_core::{Cart, checkout};
//!
//! let client = ShopClient::new("http://localhost:3000")?;
//! let mut cart = Cart::new();
//! for product in client.get_products().await?.iter().take(2) {
//!     cart.add(product);
//! }
//! let confirmation = checkout::submit_order(&mut cart, &form, &client).await?;
//! println!("pay with reference {}", confirmation.payment_info.reference);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod admin;
mod error;
mod http;
mod shop;

pub use admin::AdminClient;
pub use error::ClientError;
pub use shop::ShopClient;
