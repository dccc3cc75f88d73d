//! Order book snapshot for market data

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::book::OrderBook;
use super::error::OrderBookError;
use super::limit::Limit;
use super::order::{Order, OrderId, Price, Quantity, Side};
use crate::utils::current_time_millis;

/// A resting order as seen by market data consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub user_id: String,
    pub side: Side,
    pub size: Quantity,
    pub timestamp: u64,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            user_id: order.user_id().to_string(),
            side: order.side(),
            size: order.size(),
            timestamp: order.timestamp(),
        }
    }
}

/// One price level with its queue in time priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub price: Price,
    pub total_volume: Quantity,
    pub orders: Vec<OrderSnapshot>,
}

impl From<&Limit> for LevelSnapshot {
    fn from(limit: &Limit) -> Self {
        Self {
            price: limit.price(),
            total_volume: limit.total_volume(),
            orders: limit.orders().map(OrderSnapshot::from).collect(),
        }
    }
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The market this snapshot was taken from
    pub market: String,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Bid levels, highest price first
    pub bids: Vec<LevelSnapshot>,

    /// Ask levels, lowest price first
    pub asks: Vec<LevelSnapshot>,

    /// Volume across every bid level, including those cut off by the depth
    pub bids_total_volume: Quantity,

    /// Volume across every ask level, including those cut off by the depth
    pub asks_total_volume: Quantity,
}

impl OrderBookSnapshot {
    /// Get the best bid price and the volume resting there
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        let best = self.bids.first().map(|l| (l.price, l.total_volume));
        trace!("best_bid: {:?}", best);
        best
    }

    /// Get the best ask price and the volume resting there
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        let best = self.asks.first().map(|l| (l.price, l.total_volume));
        trace!("best_ask: {:?}", best);
        best
    }

    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }

    /// Number of resting orders across the included levels.
    pub fn order_count(&self) -> usize {
        self.bids
            .iter()
            .chain(&self.asks)
            .map(|l| l.orders.len())
            .sum()
    }

    /// Serialize the snapshot to JSON.
    ///
    /// # Errors
    /// [`OrderBookError::SerializationError`] if encoding fails.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot previously produced by [`Self::to_json`].
    ///
    /// # Errors
    /// [`OrderBookError::SerializationError`] on malformed input.
    pub fn from_json(data: &str) -> Result<Self, OrderBookError> {
        Ok(serde_json::from_str(data)?)
    }
}

impl OrderBook {
    /// Capture the `depth` best levels of each side.
    ///
    /// Side totals always cover the whole book.
    pub fn create_snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let bids: Vec<LevelSnapshot> = self
            .limits(Side::Bid)
            .take(depth)
            .map(LevelSnapshot::from)
            .collect();
        let asks: Vec<LevelSnapshot> = self
            .limits(Side::Ask)
            .take(depth)
            .map(LevelSnapshot::from)
            .collect();

        trace!(
            "Order book {}: snapshot with {} bid and {} ask levels",
            self.market,
            bids.len(),
            asks.len()
        );

        OrderBookSnapshot {
            market: self.market.clone(),
            timestamp: current_time_millis(),
            bids,
            asks,
            bids_total_volume: self.bids_total_volume(),
            asks_total_volume: self.asks_total_volume(),
        }
    }

    /// Capture every level of the book.
    pub fn snapshot(&self) -> OrderBookSnapshot {
        self.create_snapshot(usize::MAX)
    }

    /// Serialize a full snapshot to JSON.
    ///
    /// # Errors
    /// [`OrderBookError::SerializationError`] if encoding fails.
    pub fn snapshot_to_json(&self) -> Result<String, OrderBookError> {
        self.snapshot().to_json()
    }
}
