//! OrderBook implementation for managing price levels and order matching.

pub mod book;
pub mod error;
pub mod limit;
/// Multi-market management with settlement routing.
pub mod manager;
/// One book behind a reader/writer lock.
pub mod market;
/// Cancel many resting orders at once.
pub mod mass_cancel;
pub mod matching;
/// Contains the core logic for resting and canceling limit orders.
pub mod operations;
pub mod order;
pub mod snapshot;
/// Trade ledger and listener events
pub mod trade;

pub use book::{OrderBook, OrderLocation, UserOrders};
pub use error::OrderBookError;
pub use limit::{Limit, Match};
pub use market::Market;
pub use mass_cancel::MassCancelResult;
pub use order::{Order, OrderId, Price, Quantity, Side, UserId};
pub use snapshot::{LevelSnapshot, OrderBookSnapshot, OrderSnapshot};
pub use trade::{FillSummary, Trade, TradeEvent, TradeLedger, TradeListener, TradeResult};
