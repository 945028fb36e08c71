//! Crown Shop Core - Shared domain library.
//!
//! This crate provides the types used across all Crown Shop components:
//! - `storefront` - HTTP server for the catalog, checkout and admin order desk
//! - `client` - HTTP client used by front ends and integration tests
//! - `cli` - Command-line tools for migrations, seeding and admin setup
//!
//! # Architecture
//!
//! The core crate contains only types, pure logic and traits - no database
//! access and no HTTP clients. Checkout talks to the outside world through the
//! [`checkout::OrderGateway`] trait, which the client crate implements.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, required text and order status
//! - [`product`] - Customer-visible catalog projection
//! - [`cart`] - Client-held cart aggregation
//! - [`order`] - Persisted order records
//! - [`api`] - JSON payloads exchanged over HTTP
//! - [`checkout`] - Cart + shipping form to submitted order

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderLineSnapshot};
pub use product::Product;
pub use types::*;
