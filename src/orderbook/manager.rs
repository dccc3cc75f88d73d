//! Multi-market management with centralized settlement routing.
//!
//! Each market added to a manager gets a trade listener that forwards its
//! [`TradeEvent`]s over a channel. A processor drains the channel and hands
//! every match to a [`Settlement`] collaborator. Settlement runs outside the
//! market lock; failures are logged and never retried.
//!
//! [`BookManagerStd`] drains the channel on a std thread
//! (`crossbeam::channel`), [`BookManagerTokio`] on a Tokio task
//! (`tokio::sync::mpsc`).

use crate::orderbook::book::UserOrders;
use crate::orderbook::error::OrderBookError;
use crate::orderbook::limit::Match;
use crate::orderbook::market::Market;
use crate::orderbook::order::{Order, OrderId, Price, Quantity, Side};
use crate::orderbook::snapshot::OrderBookSnapshot;
use crate::orderbook::trade::{Trade, TradeEvent, TradeListener, TradeResult};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Transfer owed after one match: the taker pays or receives `size` at the
/// maker's `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    pub market: String,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_user_id: String,
    pub taker_user_id: String,
    pub taker_side: Side,
    pub size: Quantity,
    pub price: Price,
}

impl SettlementInstruction {
    pub fn from_match(market: &str, m: &Match) -> Self {
        Self {
            market: market.to_string(),
            maker_order_id: m.maker_order_id(),
            taker_order_id: m.taker_order_id(),
            maker_user_id: m.maker_user_id().to_string(),
            taker_user_id: m.taker_user_id().to_string(),
            taker_side: m.taker_side,
            size: m.size_filled,
            price: m.price,
        }
    }

    /// User receiving the base asset.
    pub fn buyer(&self) -> &str {
        match self.taker_side {
            Side::Bid => &self.taker_user_id,
            Side::Ask => &self.maker_user_id,
        }
    }

    /// User delivering the base asset.
    pub fn seller(&self) -> &str {
        match self.taker_side {
            Side::Bid => &self.maker_user_id,
            Side::Ask => &self.taker_user_id,
        }
    }

    /// Quote amount changing hands, `None` when it cannot be represented.
    pub fn notional(&self) -> Option<Quantity> {
        self.size.checked_mul(self.price)
    }
}

/// Errors reported by a [`Settlement`] collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("settlement rejected for user {user_id}: {reason}")]
    Rejected { user_id: String, reason: String },

    #[error("settlement backend unavailable: {0}")]
    Unavailable(String),
}

/// Receives the transfers owed after each match.
pub trait Settlement: Send + Sync {
    fn settle(&self, instruction: &SettlementInstruction) -> Result<(), SettlementError>;
}

/// Settlement that only logs the instruction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSettlement;

impl Settlement for LoggingSettlement {
    fn settle(&self, instruction: &SettlementInstruction) -> Result<(), SettlementError> {
        info!(
            "Settle {}: {} buys {} from {} at {}",
            instruction.market,
            instruction.buyer(),
            instruction.size,
            instruction.seller(),
            instruction.price
        );
        Ok(())
    }
}

/// Hand every match of `event` to `settlement`, logging failures.
///
/// Returns the number of instructions that settled.
fn settle_trade_event(settlement: &dyn Settlement, event: &TradeEvent) -> usize {
    let summary = event.trade_result.summary();
    info!(
        "Processing trade for {}: {} matches, executed size: {}",
        event.market, summary.match_count, summary.total_size
    );

    let mut settled = 0;
    for m in &event.trade_result.matches {
        let instruction = SettlementInstruction::from_match(&event.market, m);
        match settlement.settle(&instruction) {
            Ok(()) => settled += 1,
            Err(e) => error!(
                "Settlement failed for {} (maker {}, taker {}, size {} @ {}): {}",
                event.market,
                instruction.maker_user_id,
                instruction.taker_user_id,
                instruction.size,
                instruction.price,
                e
            ),
        }
    }
    settled
}

fn trade_event(trade_result: &TradeResult) -> TradeEvent {
    TradeEvent {
        market: trade_result.market.clone(),
        trade_result: trade_result.clone(),
        timestamp: current_time_millis(),
    }
}

/// Trait for managing multiple markets with centralized settlement routing.
///
/// Inbound operations name the market; an unknown market fails with
/// [`OrderBookError::InvalidMarket`].
pub trait BookManager {
    /// Add a new market with an automatically configured trade listener.
    ///
    /// Replaces any market already registered under that name.
    fn add_book(&mut self, market: &str) -> Arc<Market>;

    fn get_book(&self, market: &str) -> Option<&Arc<Market>>;

    /// Names of all markets in this manager.
    fn markets(&self) -> Vec<String>;

    fn remove_book(&mut self, market: &str) -> Option<Arc<Market>>;

    fn has_book(&self, market: &str) -> bool {
        self.get_book(market).is_some()
    }

    fn book_count(&self) -> usize;

    /// Resolve `market` or fail with [`OrderBookError::InvalidMarket`].
    fn market(&self, market: &str) -> Result<&Arc<Market>, OrderBookError> {
        self.get_book(market)
            .ok_or_else(|| OrderBookError::InvalidMarket(market.to_string()))
    }

    fn place_limit_order(
        &self,
        market: &str,
        user_id: &str,
        side: Side,
        size: Quantity,
        price: Price,
    ) -> Result<OrderId, OrderBookError> {
        self.market(market)?
            .submit_limit_order(user_id, side, size, price)
    }

    fn place_market_order(
        &self,
        market: &str,
        user_id: &str,
        side: Side,
        size: Quantity,
    ) -> Result<(OrderId, Vec<Match>), OrderBookError> {
        self.market(market)?.submit_market_order(user_id, side, size)
    }

    fn cancel_order(&self, market: &str, order_id: OrderId) -> Result<Order, OrderBookError> {
        self.market(market)?.cancel_order(order_id)
    }

    fn best_price(&self, market: &str, side: Side) -> Result<Option<Price>, OrderBookError> {
        Ok(self.market(market)?.best_price(side))
    }

    fn user_orders(&self, market: &str, user_id: &str) -> Result<UserOrders, OrderBookError> {
        Ok(self.market(market)?.user_orders(user_id))
    }

    fn trades(&self, market: &str) -> Result<Vec<Trade>, OrderBookError> {
        Ok(self.market(market)?.trades())
    }

    fn snapshot(&self, market: &str) -> Result<OrderBookSnapshot, OrderBookError> {
        Ok(self.market(market)?.snapshot())
    }
}

/// BookManager implementation draining trade events on a std thread.
pub struct BookManagerStd {
    /// Markets indexed by name
    books: HashMap<String, Arc<Market>>,
    settlement: Arc<dyn Settlement>,
    trade_sender: crossbeam::channel::Sender<TradeEvent>,
    /// Receiver for trade events (taken when processor starts)
    trade_receiver: Option<crossbeam::channel::Receiver<TradeEvent>>,
}

impl BookManagerStd {
    pub fn new(settlement: Arc<dyn Settlement>) -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();

        Self {
            books: HashMap::new(),
            settlement,
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// Start the trade event processor in a separate thread.
    ///
    /// Returns `None` when the processor was already started. The thread
    /// stops once the manager and every market it created are dropped.
    pub fn start_trade_processor(&mut self) -> Option<std::thread::JoinHandle<()>> {
        let receiver = self.trade_receiver.take()?;
        let settlement = Arc::clone(&self.settlement);

        Some(std::thread::spawn(move || {
            info!("Trade processor started");

            while let Ok(trade_event) = receiver.recv() {
                settle_trade_event(settlement.as_ref(), &trade_event);
            }

            info!("Trade processor stopped");
        }))
    }
}

impl BookManager for BookManagerStd {
    fn add_book(&mut self, market: &str) -> Arc<Market> {
        let sender = self.trade_sender.clone();
        let market_name = market.to_string();

        let trade_listener: TradeListener = Arc::new(move |trade_result: &TradeResult| {
            if let Err(e) = sender.send(trade_event(trade_result)) {
                error!("Failed to send trade event for {}: {}", market_name, e);
            }
        });

        let book = Arc::new(Market::new(market));
        book.set_trade_listener(trade_listener);
        self.books.insert(market.to_string(), Arc::clone(&book));
        info!("Added order book for market: {}", market);
        book
    }

    fn get_book(&self, market: &str) -> Option<&Arc<Market>> {
        self.books.get(market)
    }

    fn markets(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }

    fn remove_book(&mut self, market: &str) -> Option<Arc<Market>> {
        let result = self.books.remove(market);
        if result.is_some() {
            info!("Removed order book for market: {}", market);
        }
        result
    }

    fn book_count(&self) -> usize {
        self.books.len()
    }
}

impl Default for BookManagerStd {
    fn default() -> Self {
        Self::new(Arc::new(LoggingSettlement))
    }
}

/// BookManager implementation draining trade events on a Tokio task.
pub struct BookManagerTokio {
    books: HashMap<String, Arc<Market>>,
    settlement: Arc<dyn Settlement>,
    trade_sender: tokio::sync::mpsc::UnboundedSender<TradeEvent>,
    trade_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<TradeEvent>>,
}

impl BookManagerTokio {
    pub fn new(settlement: Arc<dyn Settlement>) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();

        Self {
            books: HashMap::new(),
            settlement,
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// Start the trade event processor as an async task.
    ///
    /// Must be called from within a Tokio runtime. Returns `None` when the
    /// processor was already started.
    pub fn start_trade_processor(&mut self) -> Option<tokio::task::JoinHandle<()>> {
        let mut receiver = self.trade_receiver.take()?;
        let settlement = Arc::clone(&self.settlement);

        Some(tokio::spawn(async move {
            info!("Trade processor started (Tokio)");

            while let Some(trade_event) = receiver.recv().await {
                settle_trade_event(settlement.as_ref(), &trade_event);
            }

            info!("Trade processor stopped (Tokio)");
        }))
    }
}

impl BookManager for BookManagerTokio {
    fn add_book(&mut self, market: &str) -> Arc<Market> {
        let sender = self.trade_sender.clone();
        let market_name = market.to_string();

        let trade_listener: TradeListener = Arc::new(move |trade_result: &TradeResult| {
            if let Err(e) = sender.send(trade_event(trade_result)) {
                error!("Failed to send trade event for {}: {}", market_name, e);
            }
        });

        let book = Arc::new(Market::new(market));
        book.set_trade_listener(trade_listener);
        self.books.insert(market.to_string(), Arc::clone(&book));
        info!("Added order book for market: {}", market);
        book
    }

    fn get_book(&self, market: &str) -> Option<&Arc<Market>> {
        self.books.get(market)
    }

    fn markets(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }

    fn remove_book(&mut self, market: &str) -> Option<Arc<Market>> {
        let result = self.books.remove(market);
        if result.is_some() {
            info!("Removed order book for market: {}", market);
        }
        result
    }

    fn book_count(&self) -> usize {
        self.books.len()
    }
}

impl Default for BookManagerTokio {
    fn default() -> Self {
        Self::new(Arc::new(LoggingSettlement))
    }
}
