//! Snapshots as served to market data consumers.

use clob::{OrderBook, OrderBookSnapshot, Side};
use rust_decimal::Decimal;

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn snapshot_reflects_fills_and_cancels() {
    let mut book = OrderBook::new("BTC-USD");
    let a = book.submit_limit_order("m1", Side::Ask, d(5), d(101)).unwrap();
    book.submit_limit_order("m2", Side::Ask, d(5), d(101)).unwrap();
    book.submit_limit_order("m3", Side::Ask, d(2), d(105)).unwrap();
    book.submit_limit_order("m4", Side::Bid, d(7), d(99)).unwrap();

    book.submit_market_order("t", Side::Bid, d(6)).unwrap();
    book.cancel_order(a).ok();

    let snapshot = book.snapshot();
    assert_eq!(snapshot.asks.len(), 2);
    assert_eq!(snapshot.asks[0].price, d(101));
    assert_eq!(snapshot.asks[0].total_volume, d(4));
    assert_eq!(snapshot.asks[0].orders.len(), 1);
    assert_eq!(snapshot.asks[0].orders[0].user_id, "m2");
    assert_eq!(snapshot.asks_total_volume, d(6));
    assert_eq!(snapshot.bids_total_volume, d(7));
}

#[test]
fn snapshot_json_is_stable() {
    let mut book = OrderBook::new("BTC-USD");
    book.submit_limit_order("m", Side::Bid, d(3), d(99)).unwrap();

    let json = book.snapshot_to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["market"], "BTC-USD");
    assert_eq!(value["bids"][0]["price"], "99");
    assert_eq!(value["bids"][0]["orders"][0]["side"], "bid");
    assert!(value["asks"].as_array().unwrap().is_empty());

    let restored = OrderBookSnapshot::from_json(&json).unwrap();
    assert_eq!(restored.best_bid(), Some((d(99), d(3))));
}
