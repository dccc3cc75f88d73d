//! Core OrderBook implementation for managing price levels and orders

use super::error::OrderBookError;
use super::limit::Limit;
use super::order::{Order, OrderId, Price, Quantity, Side};
use super::trade::{TradeLedger, TradeListener};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::trace;

/// Where a resting order lives: its side and the price key of its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLocation {
    pub side: Side,
    pub price: Price,
}

/// Resting orders of one user, split by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserOrders {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

impl UserOrders {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// The OrderBook keeps the resting liquidity of a single market.
///
/// Each side is a `BTreeMap` keyed by price, which serves both as the
/// price-to-limit lookup and as the priority order: bids are walked from the
/// highest key down, asks from the lowest key up. Time priority lives inside
/// each [`Limit`].
///
/// Mutations take `&mut self`; wrap the book in a [`Market`](crate::Market)
/// to share it between threads.
pub struct OrderBook {
    /// The market identifier for this order book
    pub(super) market: String,

    /// Bid side price levels
    pub(super) bids: BTreeMap<Price, Limit>,

    /// Ask side price levels
    pub(super) asks: BTreeMap<Price, Limit>,

    /// Order id to (side, price) of the limit holding it
    pub(super) orders: HashMap<OrderId, OrderLocation>,

    /// Every execution, oldest first
    pub(super) trades: TradeLedger,

    /// Minimum price increment. `None` disables validation (default).
    pub(super) tick_size: Option<Price>,

    /// listens to trades produced by market orders
    pub(super) trade_listener: Option<TradeListener>,
}

impl OrderBook {
    /// Create a new order book for the given market
    pub fn new(market: &str) -> Self {
        Self {
            market: market.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            trades: TradeLedger::new(),
            tick_size: None,
            trade_listener: None,
        }
    }

    /// Create a new order book whose limit prices must be exact multiples of
    /// `tick_size`.
    pub fn with_tick_size(market: &str, tick_size: Price) -> Self {
        let mut book = Self::new(market);
        book.set_tick_size(tick_size);
        book
    }

    /// Create a new order book that reports every market order execution to
    /// `trade_listener`.
    pub fn with_trade_listener(market: &str, trade_listener: TradeListener) -> Self {
        let mut book = Self::new(market);
        book.trade_listener = Some(trade_listener);
        book
    }

    /// Set the tick size. A non-positive value disables validation.
    pub fn set_tick_size(&mut self, tick_size: Price) {
        self.tick_size = (tick_size > Price::ZERO).then_some(tick_size);
    }

    pub fn set_trade_listener(&mut self, trade_listener: TradeListener) {
        self.trade_listener = Some(trade_listener);
    }

    pub fn remove_trade_listener(&mut self) {
        self.trade_listener = None;
    }

    #[must_use]
    pub fn tick_size(&self) -> Option<Price> {
        self.tick_size
    }

    /// Get the market identifier for this book
    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }

    pub(super) fn side_levels(&self, side: Side) -> &BTreeMap<Price, Limit> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    pub(super) fn side_levels_mut(&mut self, side: Side) -> &mut BTreeMap<Price, Limit> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Limits of one side in execution priority.
    pub fn limits(&self, side: Side) -> Box<dyn Iterator<Item = &Limit> + '_> {
        match side {
            Side::Bid => Box::new(self.bids.values().rev()),
            Side::Ask => Box::new(self.asks.values()),
        }
    }

    /// Bid limits, highest price first.
    #[must_use]
    pub fn bid_limits_list(&self) -> Vec<&Limit> {
        self.limits(Side::Bid).collect()
    }

    /// Ask limits, lowest price first.
    #[must_use]
    pub fn ask_limits_list(&self) -> Vec<&Limit> {
        self.limits(Side::Ask).collect()
    }

    #[must_use]
    pub fn get_limit(&self, side: Side, price: Price) -> Option<&Limit> {
        self.side_levels(side).get(&price)
    }

    /// Sum of the aggregate volumes of all bid limits.
    #[must_use]
    pub fn bids_total_volume(&self) -> Quantity {
        self.total_volume(Side::Bid)
    }

    /// Sum of the aggregate volumes of all ask limits.
    #[must_use]
    pub fn asks_total_volume(&self) -> Quantity {
        self.total_volume(Side::Ask)
    }

    /// Sum of the aggregate volumes of one side.
    ///
    /// Placement rejects orders that would overflow a side, so the sum is
    /// always exact for a book built through the public API.
    #[must_use]
    pub fn total_volume(&self, side: Side) -> Quantity {
        self.side_levels(side)
            .values()
            .fold(Quantity::ZERO, |total, limit| {
                total.saturating_add(limit.total_volume())
            })
    }

    /// Best price on `side`: highest bid or lowest ask.
    #[must_use]
    pub fn best_price(&self, side: Side) -> Option<Price> {
        let best = match side {
            Side::Bid => self.bids.keys().next_back().copied(),
            Side::Ask => self.asks.keys().next().copied(),
        };
        trace!("Order book {}: best {} {:?}", self.market, side, best);
        best
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.best_price(Side::Bid)
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.best_price(Side::Ask)
    }

    /// Best ask minus best bid.
    ///
    /// Limit orders never cross on placement, so this can be zero or
    /// negative when makers quote through each other.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    #[must_use]
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(bid + (ask - bid) / Price::TWO),
            _ => None,
        }
    }

    /// Number of resting orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    #[must_use]
    pub fn order_location(&self, order_id: OrderId) -> Option<OrderLocation> {
        self.orders.get(&order_id).copied()
    }

    /// Look up a resting order by id.
    #[must_use]
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let location = self.orders.get(&order_id)?;
        self.side_levels(location.side)
            .get(&location.price)?
            .get_order(order_id)
    }

    /// Resting orders owned by `user_id`, split by side.
    ///
    /// One pass over the resident orders, so it costs O(resting orders).
    /// Each list is in arrival order.
    #[must_use]
    pub fn user_orders(&self, user_id: &str) -> UserOrders {
        let owned = |side: Side| {
            let mut orders: Vec<Order> = self
                .limits(side)
                .flat_map(Limit::orders)
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect();
            orders.sort_by_key(Order::timestamp);
            orders
        };

        UserOrders {
            bids: owned(Side::Bid),
            asks: owned(Side::Ask),
        }
    }

    /// Ids of every resting order owned by `user_id`.
    pub(super) fn user_order_ids(&self, user_id: &str) -> Vec<OrderId> {
        self.limits(Side::Bid)
            .chain(self.limits(Side::Ask))
            .flat_map(Limit::orders)
            .filter(|o| o.user_id == user_id)
            .map(Order::id)
            .collect()
    }

    /// Executions so far, oldest first.
    #[must_use]
    pub fn trades(&self) -> &TradeLedger {
        &self.trades
    }

    /// Verify the cross-structure invariants of the book.
    ///
    /// Every indexed order must be resident in exactly the limit its location
    /// names, every resident order must be indexed, no limit may be empty and
    /// every limit's aggregate volume must equal its orders' sizes.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        let mut resident = 0usize;

        for side in [Side::Bid, Side::Ask] {
            for (price, limit) in self.side_levels(side) {
                if limit.is_empty() || limit.price() != *price {
                    return false;
                }
                let sum: Quantity = limit.orders().map(Order::size).sum();
                if sum != limit.total_volume() {
                    return false;
                }
                for order in limit.orders() {
                    resident += 1;
                    let expected = OrderLocation {
                        side,
                        price: *price,
                    };
                    if order.side != side
                        || order.limit != Some(*price)
                        || order.is_filled()
                        || self.orders.get(&order.id) != Some(&expected)
                    {
                        return false;
                    }
                }
            }
        }

        resident == self.orders.len()
    }

    /// Reject prices that are not strictly positive or not on the tick grid.
    pub(super) fn validate_price(&self, price: Price) -> Result<(), OrderBookError> {
        if price <= Price::ZERO {
            return Err(OrderBookError::InvalidPrice(price));
        }
        match self.tick_size {
            Some(tick_size) if !(price % tick_size).is_zero() => {
                Err(OrderBookError::InvalidTickSize { price, tick_size })
            }
            _ => Ok(()),
        }
    }

    pub(super) fn validate_size(size: Quantity) -> Result<(), OrderBookError> {
        if size <= Quantity::ZERO {
            return Err(OrderBookError::InvalidSize(size));
        }
        Ok(())
    }
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBook")
            .field("market", &self.market)
            .field("bid_levels", &self.bids.len())
            .field("ask_levels", &self.asks.len())
            .field("orders", &self.orders.len())
            .field("trades", &self.trades.len())
            .field("tick_size", &self.tick_size)
            .field("has_trade_listener", &self.trade_listener.is_some())
            .finish()
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OrderBook {}", self.market)?;
        for limit in self.limits(Side::Ask).collect::<Vec<_>>().into_iter().rev() {
            writeln!(f, "  ask {limit}")?;
        }
        for limit in self.limits(Side::Bid) {
            writeln!(f, "  bid {limit}")?;
        }
        Ok(())
    }
}
