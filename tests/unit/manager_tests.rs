//! Settlement routing across independent markets.

use clob::{
    BookManager, BookManagerStd, BookManagerTokio, OrderBookError, Settlement, SettlementError,
    SettlementInstruction, Side,
};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

/// Records instructions and fails every one whose size is above a limit.
struct CappedSettlement {
    max_size: Decimal,
    accepted: Mutex<Vec<SettlementInstruction>>,
    attempts: Mutex<usize>,
}

impl CappedSettlement {
    fn new(max_size: i64) -> Self {
        Self {
            max_size: d(max_size),
            accepted: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        }
    }
}

impl Settlement for CappedSettlement {
    fn settle(&self, instruction: &SettlementInstruction) -> Result<(), SettlementError> {
        *self.attempts.lock().unwrap() += 1;
        if instruction.size > self.max_size {
            return Err(SettlementError::Rejected {
                user_id: instruction.taker_user_id.clone(),
                reason: "size above limit".to_string(),
            });
        }
        self.accepted.lock().unwrap().push(instruction.clone());
        Ok(())
    }
}

#[test]
fn failed_settlement_is_not_retried_and_book_keeps_the_fill() {
    let settlement = Arc::new(CappedSettlement::new(5));
    let mut manager = BookManagerStd::new(settlement.clone());
    let processor = manager.start_trade_processor().unwrap();
    manager.add_book("BTC-USD");

    manager
        .place_limit_order("BTC-USD", "maker", Side::Ask, d(10), d(100))
        .unwrap();
    manager
        .place_limit_order("BTC-USD", "maker", Side::Ask, d(3), d(101))
        .unwrap();
    manager
        .place_market_order("BTC-USD", "taker", Side::Bid, d(13))
        .unwrap();

    let trades = manager.trades("BTC-USD").unwrap();
    assert_eq!(trades.len(), 2);
    assert!(manager.snapshot("BTC-USD").unwrap().asks.is_empty());

    drop(manager);
    processor.join().unwrap();

    assert_eq!(*settlement.attempts.lock().unwrap(), 2);
    let accepted = settlement.accepted.lock().unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].price, d(101));
    assert_eq!(accepted[0].buyer(), "taker");
}

#[test]
fn markets_are_independent() {
    let mut manager = BookManagerStd::default();
    let btc = manager.add_book("BTC-USD");
    manager.add_book("ETH-USD");

    btc.submit_limit_order("maker", Side::Bid, d(1), d(30_000))
        .unwrap();

    assert_eq!(
        manager.best_price("BTC-USD", Side::Bid).unwrap(),
        Some(d(30_000))
    );
    assert_eq!(manager.best_price("ETH-USD", Side::Bid).unwrap(), None);
    assert!(manager.user_orders("ETH-USD", "maker").unwrap().is_empty());

    let mut markets = manager.markets();
    markets.sort();
    assert_eq!(markets, vec!["BTC-USD", "ETH-USD"]);
}

#[test]
fn unknown_market_operations_fail() {
    let manager = BookManagerStd::default();
    let expected = OrderBookError::InvalidMarket("DOGE-USD".to_string());

    assert_eq!(
        manager
            .place_limit_order("DOGE-USD", "u", Side::Bid, d(1), d(1))
            .unwrap_err(),
        expected
    );
    assert_eq!(
        manager
            .cancel_order("DOGE-USD", uuid::Uuid::new_v4())
            .unwrap_err(),
        expected
    );
    assert!(manager.trades("DOGE-USD").is_err());
    assert!(manager.snapshot("DOGE-USD").is_err());
}

#[tokio::test]
async fn tokio_manager_settles_every_market() {
    let settlement = Arc::new(CappedSettlement::new(100));
    let mut manager = BookManagerTokio::new(settlement.clone());
    let processor = manager.start_trade_processor().unwrap();

    for market in ["BTC-USD", "ETH-USD", "SOL-USD"] {
        manager.add_book(market);
        manager
            .place_limit_order(market, "maker", Side::Bid, d(2), d(10))
            .unwrap();
        manager
            .place_market_order(market, "taker", Side::Ask, d(2))
            .unwrap();
    }

    drop(manager);
    processor.await.unwrap();

    let accepted = settlement.accepted.lock().unwrap();
    assert_eq!(accepted.len(), 3);
    assert!(accepted.iter().all(|i| i.seller() == "taker"));
}
