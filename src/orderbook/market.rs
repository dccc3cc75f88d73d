//! A single market: one [`OrderBook`] behind a reader/writer lock.
//!
//! Every mutation holds the write lock for its whole duration, so a market
//! order sweep is never interleaved with a placement or cancel on the same
//! market. Queries take the read lock and run concurrently with each other.

use super::book::{OrderBook, UserOrders};
use super::error::OrderBookError;
use super::limit::Match;
use super::mass_cancel::MassCancelResult;
use super::order::{Order, OrderId, Price, Quantity, Side, UserId};
use super::snapshot::OrderBookSnapshot;
use super::trade::{Trade, TradeListener};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
pub struct Market {
    book: RwLock<OrderBook>,
}

impl Market {
    pub fn new(market: &str) -> Self {
        Self::from_book(OrderBook::new(market))
    }

    /// Wrap an already configured book.
    pub fn from_book(book: OrderBook) -> Self {
        Self {
            book: RwLock::new(book),
        }
    }

    /// Shared access to the book for compound reads.
    pub fn read(&self) -> RwLockReadGuard<'_, OrderBook> {
        self.book.read()
    }

    /// Exclusive access to the book for compound mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, OrderBook> {
        self.book.write()
    }

    pub fn into_inner(self) -> OrderBook {
        self.book.into_inner()
    }

    pub fn name(&self) -> String {
        self.book.read().market().to_string()
    }

    pub fn set_trade_listener(&self, trade_listener: TradeListener) {
        self.book.write().set_trade_listener(trade_listener);
    }

    /// See [`OrderBook::place_limit_order`].
    pub fn place_limit_order(&self, order: Order, price: Price) -> Result<OrderId, OrderBookError> {
        self.book.write().place_limit_order(order, price)
    }

    /// See [`OrderBook::submit_limit_order`].
    pub fn submit_limit_order(
        &self,
        user_id: impl Into<UserId>,
        side: Side,
        size: Quantity,
        price: Price,
    ) -> Result<OrderId, OrderBookError> {
        self.book
            .write()
            .submit_limit_order(user_id, side, size, price)
    }

    /// See [`OrderBook::place_market_order`].
    pub fn place_market_order(&self, order: Order) -> Result<Vec<Match>, OrderBookError> {
        self.book.write().place_market_order(order)
    }

    /// See [`OrderBook::submit_market_order`].
    pub fn submit_market_order(
        &self,
        user_id: impl Into<UserId>,
        side: Side,
        size: Quantity,
    ) -> Result<(OrderId, Vec<Match>), OrderBookError> {
        self.book.write().submit_market_order(user_id, side, size)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> Result<Order, OrderBookError> {
        self.book.write().cancel_order(order_id)
    }

    pub fn cancel_orders_by_user(&self, user_id: &str) -> MassCancelResult {
        self.book.write().cancel_orders_by_user(user_id)
    }

    pub fn cancel_orders_by_side(&self, side: Side) -> MassCancelResult {
        self.book.write().cancel_orders_by_side(side)
    }

    pub fn cancel_all_orders(&self) -> MassCancelResult {
        self.book.write().cancel_all_orders()
    }

    pub fn best_price(&self, side: Side) -> Option<Price> {
        self.book.read().best_price(side)
    }

    pub fn user_orders(&self, user_id: &str) -> UserOrders {
        self.book.read().user_orders(user_id)
    }

    pub fn bids_total_volume(&self) -> Quantity {
        self.book.read().bids_total_volume()
    }

    pub fn asks_total_volume(&self) -> Quantity {
        self.book.read().asks_total_volume()
    }

    /// Copy of the whole trade ledger.
    pub fn trades(&self) -> Vec<Trade> {
        self.book.read().trades().as_slice().to_vec()
    }

    /// Trades appended at or after `cursor`, plus the cursor to pass next time.
    pub fn trades_since(&self, cursor: usize) -> (Vec<Trade>, usize) {
        let book = self.book.read();
        let trades = book.trades();
        (trades.since(cursor).to_vec(), trades.len())
    }

    pub fn snapshot(&self) -> OrderBookSnapshot {
        self.book.read().snapshot()
    }
}

impl From<OrderBook> for Market {
    fn from(book: OrderBook) -> Self {
        Self::from_book(book)
    }
}
