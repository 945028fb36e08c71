//! Core types for Crown Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;
pub mod text;

pub use id::*;
pub use price::{Price, PriceError};
pub use status::{OrderStatus, StatusParseError, TransitionError};
pub use text::{RequiredText, TextError};
