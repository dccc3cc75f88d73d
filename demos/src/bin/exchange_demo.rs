//! Simulated exchange session on one market.
//!
//! This example shows how to:
//! 1. Register a market in a `BookManagerStd` with a logging settlement
//! 2. Seed the book with a wide two-sided quote
//! 3. Run a market maker that keeps quoting inside the spread
//! 4. Run a taker that alternates market sells and buys
//!
//! Set `RUST_LOG=debug` (or `trace`) for the book internals.

use clob::prelude::{BookManager, BookManagerStd, Market, OrderBookError, Side};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const MARKET: &str = "ETH";
const MAX_MAKER_ORDERS: usize = 10;
const ROUNDS: usize = 20;
const TICK: Duration = Duration::from_millis(50);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn seed_market(market: &Market) -> Result<(), OrderBookError> {
    let size = Decimal::from(2_000_000);
    market.submit_limit_order("1", Side::Bid, size, Decimal::from(3_500))?;
    market.submit_limit_order("1", Side::Ask, size, Decimal::from(3_600))?;
    Ok(())
}

/// Quote one step inside the best prices while under the order cap.
fn make_market(market: &Market) {
    let step = Decimal::from(10);
    let size = Decimal::from(1_000);

    for _ in 0..ROUNDS {
        let orders = market.user_orders("2");
        let best_bid = market.best_price(Side::Bid);
        let best_ask = market.best_price(Side::Ask);

        if let (Some(bid), Some(ask)) = (best_bid, best_ask) {
            info!("Exchange spread: {}", (ask - bid).abs());

            if orders.bids.len() < MAX_MAKER_ORDERS {
                if let Err(e) = market.submit_limit_order("2", Side::Bid, size, bid + step) {
                    warn!("Maker bid rejected: {}", e);
                }
            }
            if orders.asks.len() < MAX_MAKER_ORDERS {
                if let Err(e) = market.submit_limit_order("2", Side::Ask, size, ask - step) {
                    warn!("Maker ask rejected: {}", e);
                }
            }
        }

        thread::sleep(TICK);
    }
}

/// Alternate market sells and buys, polling new trades between rounds.
fn place_market_orders(market: &Market) {
    let size = Decimal::from(1_000);
    let mut cursor = 0;

    for _ in 0..ROUNDS / 2 {
        for side in [Side::Ask, Side::Bid] {
            match market.submit_market_order("3", side, size) {
                Ok((order_id, matches)) => {
                    info!("Market {} {} filled in {} matches", side, order_id, matches.len())
                }
                Err(e) => warn!("Market order rejected: {}", e),
            }
        }

        let (trades, next) = market.trades_since(cursor);
        cursor = next;
        for trade in trades {
            info!("Trade: {} {} @ {}", trade.side, trade.size, trade.price);
        }

        thread::sleep(TICK * 2);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut manager = BookManagerStd::default();
    let processor = manager
        .start_trade_processor()
        .ok_or("trade processor already running")?;

    let market = manager.add_book(MARKET);
    seed_market(&market)?;

    let maker = {
        let market = Arc::clone(&market);
        thread::spawn(move || make_market(&market))
    };

    thread::sleep(TICK);
    place_market_orders(&market);
    maker.join().map_err(|_| "market maker thread panicked")?;

    let snapshot = manager.snapshot(MARKET)?;
    info!(
        "Final book: best bid {:?}, best ask {:?}, {} trades",
        snapshot.best_bid(),
        snapshot.best_ask(),
        market.trades().len()
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    drop(market);
    drop(manager);
    processor
        .join()
        .map_err(|_| "trade processor thread panicked")?;
    Ok(())
}
