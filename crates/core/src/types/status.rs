//! Order status state machine.
//!
//! ```text
//! pending ──▶ paid ──▶ shipped ──▶ completed
//! ```
//!
//! Every transition is triggered by an administrator and moves exactly one
//! step forward. Payment is confirmed by hand (bank transfer), so nothing
//! promotes an order automatically.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created at checkout, waiting for the customer's transfer.
    #[default]
    Pending,
    /// Transfer confirmed by an admin.
    Paid,
    /// Parcel handed to the courier.
    Shipped,
    /// Delivered; terminal.
    Completed,
}

/// Error returned when a status string is not one of the known states.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct StatusParseError(pub String);

/// Error returned when a requested transition is not allowed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The order is already in a terminal state.
    #[error("order is already {from}; no further transitions")]
    Terminal {
        /// Current status.
        from: OrderStatus,
    },
    /// The target is not the single forward step from the current status.
    #[error("cannot move order from {from} to {to} (next allowed: {allowed})")]
    NotAllowed {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
        /// The only status reachable from `from`.
        allowed: OrderStatus,
    },
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Shipped, Self::Completed];

    /// The lowercase wire/database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
        }
    }

    /// The only status an admin may move this order to, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Paid),
            Self::Paid => Some(Self::Shipped),
            Self::Shipped => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Whether no further transitions exist.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Validate a transition from `self` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Terminal`] if `self` is terminal, or
    /// [`TransitionError::NotAllowed`] for backward moves, skips and
    /// same-state updates.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        match self.next() {
            None => Err(TransitionError::Terminal { from: self }),
            Some(allowed) if allowed == target => Ok(target),
            Some(allowed) => Err(TransitionError::NotAllowed {
                from: self,
                to: target,
                allowed,
            }),
        }
    }

    /// Short label shown in the admin order table.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "待付款",
            Self::Paid => "已付款",
            Self::Shipped => "已发货",
            Self::Completed => "已完成",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}
