//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `admin_auth` - Admin login, bearer tokens, logout
//! - `orders` - Order placement and status transitions

pub mod admin_auth;
pub mod orders;
