//! Trade ledger and the events emitted to trade listeners.

use crate::orderbook::limit::Match;
use crate::orderbook::order::{OrderId, Price, Quantity, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One completed execution as recorded in the [`TradeLedger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier
    pub id: Uuid,
    /// Side of the aggressor (incoming) order
    pub side: Side,
    /// Execution price
    pub price: Price,
    /// Executed size
    pub size: Quantity,
    /// Wall-clock time of the execution, nanoseconds since the Unix epoch
    pub timestamp: u64,
}

impl Trade {
    pub(crate) fn from_match(m: &Match, timestamp: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            side: m.taker_side,
            price: m.price,
            size: m.size_filled,
            timestamp,
        }
    }

    #[must_use]
    pub fn is_bid(&self) -> bool {
        self.side.is_bid()
    }
}

/// Append-only record of every execution in a book, oldest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeLedger {
    trades: Vec<Trade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    /// Trades appended at or after position `cursor`.
    ///
    /// Pollers keep `ledger.len()` from their previous call as the cursor to
    /// receive only new executions. A cursor past the end yields an empty
    /// slice.
    #[must_use]
    pub fn since(&self, cursor: usize) -> &[Trade] {
        self.trades.get(cursor..).unwrap_or(&[])
    }

    #[must_use]
    pub fn last(&self) -> Option<&Trade> {
        self.trades.last()
    }

    /// Price of the most recent execution.
    #[must_use]
    pub fn last_price(&self) -> Option<Price> {
        self.last().map(|t| t.price)
    }

    /// Total executed size across the whole ledger, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total_volume(&self) -> Quantity {
        self.trades
            .iter()
            .fold(Quantity::ZERO, |total, t| total.saturating_add(t.size))
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}

/// Aggregate of the matches produced by one market order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillSummary {
    /// Total executed size
    pub total_size: Quantity,
    /// Quote amount of all matches, `None` when it cannot be represented
    pub notional: Option<Quantity>,
    /// Size-weighted average execution price, `None` without matches or
    /// when the notional overflows
    pub average_price: Option<Price>,
    /// Number of individual matches
    pub match_count: usize,
}

impl Default for FillSummary {
    fn default() -> Self {
        Self {
            total_size: Quantity::ZERO,
            notional: Some(Quantity::ZERO),
            average_price: None,
            match_count: 0,
        }
    }
}

impl FillSummary {
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut summary = Self::default();
        for m in matches {
            summary.add(m.price, m.size_filled);
        }
        summary
    }

    /// Fold one execution of `size` at `price` into the summary.
    pub(crate) fn add(&mut self, price: Price, size: Quantity) {
        self.total_size = self.total_size.saturating_add(size);
        self.notional = self
            .notional
            .and_then(|n| price.checked_mul(size).and_then(|q| n.checked_add(q)));
        self.average_price = self.notional.and_then(|n| n.checked_div(self.total_size));
        self.match_count += 1;
    }
}

/// Result of a market order, handed to the [`TradeListener`].
#[derive(Debug, Clone, Serialize)]
pub struct TradeResult {
    /// Market this trade result belongs to
    pub market: String,
    /// The incoming (taker) order
    pub order_id: OrderId,
    /// Side of the incoming order
    pub side: Side,
    /// Matches in execution order
    pub matches: Vec<Match>,
}

impl TradeResult {
    pub fn new(market: String, order_id: OrderId, side: Side, matches: Vec<Match>) -> Self {
        Self {
            market,
            order_id,
            side,
            matches,
        }
    }

    #[must_use]
    pub fn summary(&self) -> FillSummary {
        FillSummary::from_matches(&self.matches)
    }
}

/// Trade listener specification using Arc for shared ownership
pub type TradeListener = Arc<dyn Fn(&TradeResult) + Send + Sync>;

/// A trade event that includes additional metadata for processing
#[derive(Debug, Clone)]
pub struct TradeEvent {
    /// The market this event came from
    pub market: String,
    /// The trade result containing match details
    pub trade_result: TradeResult,
    /// Unix timestamp in milliseconds when the event was emitted
    pub timestamp: u64,
}
