//! # Limit Order Book and Matching Engine
//!
//! A single-market central limit order book with strict price-time priority.
//! Limit orders rest on the book, market orders take liquidity from the
//! opposite side and execute at the resting (maker) price, and every
//! execution lands in an append-only trade ledger.
//!
//! ## Key Features
//!
//! - **Price-Time Priority**: price levels are kept sorted in a `BTreeMap`;
//!   inside a level orders fill strictly in arrival order.
//!
//! - **All-or-Nothing Market Orders**: a market order larger than the
//!   opposite side's total volume is rejected with
//!   [`OrderBookError::InsufficientLiquidity`] before anything changes.
//!
//! - **Exact Arithmetic**: prices and sizes are `rust_decimal::Decimal`.
//!
//! - **Trade Ledger**: every match is recorded; consumers poll it with a
//!   cursor via [`TradeLedger::since`].
//!
//! - **Per-Market Locking**: [`Market`] puts one book behind a reader/writer
//!   lock so a sweep is never interleaved with placements or cancels.
//!
//! - **Multi-Market Management**: [`BookManagerStd`] and [`BookManagerTokio`]
//!   route each market's matches to a [`Settlement`] collaborator over a
//!   channel.
//!
//! ## Example
//!
//! ```rust
//! use clob::{OrderBook, Side};
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new("BTC-USD");
//! book.submit_limit_order("maker", Side::Ask, Decimal::from(10), Decimal::from(9000))
//!     .unwrap();
//!
//! let (_, matches) = book
//!     .submit_market_order("taker", Side::Bid, Decimal::from(4))
//!     .unwrap();
//!
//! assert_eq!(matches[0].price, Decimal::from(9000));
//! assert_eq!(book.asks_total_volume(), Decimal::from(6));
//! assert_eq!(book.trades().len(), 1);
//! ```
//!
//! ## Limit Orders Never Cross
//!
//! `place_limit_order` only rests. A bid priced at or above the best ask is
//! stored as-is and the book may become locked or crossed; liquidity is only
//! taken by market orders.

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::manager::{
    BookManager, BookManagerStd, BookManagerTokio, LoggingSettlement, Settlement,
    SettlementError, SettlementInstruction,
};
pub use orderbook::{
    FillSummary, Limit, MassCancelResult, Market, Match, Order, OrderBook, OrderBookError,
    OrderBookSnapshot, OrderId, Price, Quantity, Side, Trade, TradeEvent, TradeLedger,
    TradeListener, TradeResult, UserId, UserOrders,
};
pub use utils::current_time_millis;
