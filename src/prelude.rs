//! Prelude module that re-exports commonly used types and traits.
//!
//! ```rust
//! use clob::prelude::*;
//! ```

// Core order book types
pub use crate::orderbook::{
    Limit, Market, Match, Order, OrderBook, OrderBookError, OrderId, Price, Quantity, Side,
    UserId,
};

// Multi-market management and settlement
pub use crate::orderbook::manager::{
    BookManager, BookManagerStd, BookManagerTokio, LoggingSettlement, Settlement,
    SettlementError, SettlementInstruction,
};

// Snapshot types
pub use crate::orderbook::snapshot::{LevelSnapshot, OrderBookSnapshot};

// Trade-related types
pub use crate::orderbook::trade::{
    FillSummary, Trade, TradeEvent, TradeLedger, TradeListener, TradeResult,
};

pub use crate::orderbook::mass_cancel::MassCancelResult;

// Utility functions
pub use crate::utils::current_time_millis;
