//! Order book error types

use crate::orderbook::order::{OrderId, Price, Quantity, Side};
use thiserror::Error;

/// Errors that can occur within the OrderBook
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Market order larger than the resting volume on the opposite side
    #[error(
        "Insufficient liquidity for {side} market order: requested {requested}, available {available}"
    )]
    InsufficientLiquidity {
        /// The side of the market order
        side: Side,
        /// Quantity requested
        requested: Quantity,
        /// Quantity available
        available: Quantity,
    },

    /// Order not found in the book
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// An order with this id is already resting in the book
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    /// No book is registered for the market
    #[error("Invalid market: {0}")]
    InvalidMarket(String),

    /// Side string is not one of bid/ask/buy/sell
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    /// Order size must be strictly positive
    #[error("Invalid size: {0} (must be > 0)")]
    InvalidSize(Quantity),

    /// Limit price must be strictly positive
    #[error("Invalid price: {0} (must be > 0)")]
    InvalidPrice(Price),

    /// Order price is not a multiple of the configured tick size
    #[error("invalid tick size: price {price} is not a multiple of tick size {tick_size}")]
    InvalidTickSize {
        /// The order price that failed validation
        price: Price,
        /// The configured tick size
        tick_size: Price,
    },

    /// Resting the order would push a side's volume past what a quantity can
    /// represent
    #[error("Volume overflow: {side} order of size {size} at {price}")]
    VolumeOverflow {
        /// Side of the rejected order
        side: Side,
        /// Limit price of the rejected order
        price: Price,
        /// Size of the rejected order
        size: Quantity,
    },

    /// The quote amount of a market order's fill cannot be represented
    #[error("Notional overflow for {side} market order of size {size}")]
    NotionalOverflow {
        /// Side of the market order
        side: Side,
        /// Size of the market order
        size: Quantity,
    },

    /// Error while serializing book data
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Underlying error message
        message: String,
    },
}

impl From<serde_json::Error> for OrderBookError {
    fn from(err: serde_json::Error) -> Self {
        OrderBookError::SerializationError {
            message: err.to_string(),
        }
    }
}
