//! Orders and the primitive types shared by the whole book.

use crate::orderbook::error::OrderBookError;
use crate::utils::monotonic_time_nanos;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Price of a limit, in quote units.
pub type Price = Decimal;

/// Order and trade sizes, in base units.
pub type Quantity = Decimal;

/// Globally unique order identifier.
pub type OrderId = Uuid;

/// Identifier of the order owner.
pub type UserId = String;

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side.
    Bid,
    /// Sell side.
    Ask,
}

impl Side {
    /// The side an order of this side trades against.
    #[must_use]
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    #[must_use]
    #[inline]
    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

impl FromStr for Side {
    type Err = OrderBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bid" | "buy" => Ok(Side::Bid),
            "ask" | "sell" => Ok(Side::Ask),
            _ => Err(OrderBookError::InvalidSide(s.to_string())),
        }
    }
}

/// A buy or sell intent, either resting in a [`Limit`](crate::Limit) or
/// being matched as a taker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub(crate) id: OrderId,
    pub(crate) user_id: UserId,
    pub(crate) side: Side,
    /// Remaining size. Only fill operations change it, and only downwards.
    pub(crate) size: Quantity,
    pub(crate) original_size: Quantity,
    /// Arrival time in nanoseconds, strictly increasing across orders.
    pub(crate) timestamp: u64,
    /// Price key of the limit holding this order, `None` when not resting.
    pub(crate) limit: Option<Price>,
}

impl Order {
    /// Create a new order with a fresh id and arrival timestamp.
    pub fn new(user_id: impl Into<UserId>, side: Side, size: Quantity) -> Self {
        Self::with_timestamp(user_id, side, size, monotonic_time_nanos())
    }

    /// Create a new order with an explicit arrival timestamp.
    pub fn with_timestamp(
        user_id: impl Into<UserId>,
        side: Side,
        size: Quantity,
        timestamp: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            side,
            size,
            original_size: size,
            timestamp,
            limit: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> OrderId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Remaining (unfilled) size.
    #[must_use]
    pub fn size(&self) -> Quantity {
        self.size
    }

    /// Size at creation.
    #[must_use]
    pub fn original_size(&self) -> Quantity {
        self.original_size
    }

    /// Size executed so far.
    #[must_use]
    pub fn filled_size(&self) -> Quantity {
        self.original_size - self.size
    }

    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Price of the limit currently holding this order.
    #[must_use]
    pub fn limit_price(&self) -> Option<Price> {
        self.limit
    }

    #[must_use]
    pub fn is_bid(&self) -> bool {
        self.side.is_bid()
    }

    #[must_use]
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.size.is_zero()
    }

    /// Reduce the remaining size by `quantity`.
    pub(crate) fn reduce(&mut self, quantity: Quantity) {
        debug_assert!(quantity <= self.size, "fill larger than remaining size");
        self.size -= quantity;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[type: {}, size: {}, price: {}]",
            self.side,
            self.size,
            self.limit.unwrap_or_default()
        )
    }
}
