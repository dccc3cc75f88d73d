//! End-to-end order book behavior through the public API.

use clob::{Order, OrderBook, OrderBookError, Side};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn market_order_sweeps_three_levels() {
    let mut book = OrderBook::new("BTC-USD");
    let a = Order::new("1", Side::Ask, d(15));
    let a_id = a.id();
    book.place_limit_order(a, d(10_000)).unwrap();
    book.submit_limit_order("2", Side::Ask, d(10), d(11_000)).unwrap();
    book.submit_limit_order("3", Side::Ask, d(8), d(12_000)).unwrap();

    let buy = Order::new("4", Side::Bid, d(30));
    let buy_id = buy.id();
    let matches = book.place_market_order(buy).unwrap();

    assert_eq!(matches.len(), 3);
    assert_eq!(book.ask_limits_list().len(), 1);
    assert_eq!(matches[0].ask_order_id, a_id);
    assert_eq!(matches[0].bid_order_id, buy_id);
    assert_eq!(matches[0].size_filled, d(15));
    assert_eq!(matches[0].price, d(10_000));
    assert_eq!(book.asks_total_volume(), d(3));
}

#[test]
fn fractional_sizes_are_exact() {
    let mut book = OrderBook::new("ETH-USD");
    book.submit_limit_order("m", Side::Ask, dec("0.3"), dec("2500.10"))
        .unwrap();
    book.submit_limit_order("m", Side::Ask, dec("0.2"), dec("2500.20"))
        .unwrap();

    let (_, matches) = book
        .submit_market_order("t", Side::Bid, dec("0.45"))
        .unwrap();

    assert_eq!(matches[1].size_filled, dec("0.15"));
    assert_eq!(book.asks_total_volume(), dec("0.05"));
    assert_eq!(book.trades().total_volume(), dec("0.45"));
}

#[test]
fn rejected_market_order_changes_nothing() {
    let mut book = OrderBook::new("BTC-USD");
    book.submit_limit_order("1", Side::Bid, d(5), d(100)).unwrap();
    book.submit_limit_order("2", Side::Bid, d(5), d(99)).unwrap();
    let before = book.snapshot();

    let result = book.submit_market_order("3", Side::Ask, d(11));

    assert!(matches!(
        result,
        Err(OrderBookError::InsufficientLiquidity { .. })
    ));
    assert_eq!(book.snapshot().bids, before.bids);
    assert_eq!(book.order_count(), 2);
    assert!(book.trades().is_empty());
}

#[test]
fn error_messages_are_descriptive() {
    let mut book = OrderBook::new("BTC-USD");
    book.submit_limit_order("1", Side::Ask, d(2), d(100)).unwrap();

    let err = book.submit_market_order("2", Side::Bid, d(3)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Insufficient liquidity for bid market order: requested 3, available 2"
    );

    let err = book.submit_limit_order("1", Side::Ask, d(0), d(100)).unwrap_err();
    assert_eq!(err.to_string(), "Invalid size: 0 (must be > 0)");
}

#[test]
fn resting_order_is_visible_until_consumed() {
    let mut book = OrderBook::new("BTC-USD");
    let id = book.submit_limit_order("maker", Side::Bid, d(4), d(50)).unwrap();

    book.submit_market_order("t1", Side::Ask, d(1)).unwrap();
    assert_eq!(book.get_order(id).unwrap().size(), d(3));
    assert_eq!(book.user_orders("maker").bids.len(), 1);

    book.submit_market_order("t2", Side::Ask, d(3)).unwrap();
    assert!(book.get_order(id).is_none());
    assert!(book.user_orders("maker").is_empty());
    assert_eq!(book.trades().len(), 2);
    assert_eq!(book.trades().last_price(), Some(d(50)));
}

#[test]
fn trade_ledger_serializes_for_market_data() {
    let mut book = OrderBook::new("BTC-USD");
    book.submit_limit_order("m", Side::Ask, d(1), d(100)).unwrap();
    book.submit_market_order("t", Side::Bid, d(1)).unwrap();

    let json = serde_json::to_value(book.trades().as_slice()).unwrap();
    let trade = &json[0];
    assert_eq!(trade["side"], "bid");
    assert_eq!(trade["price"], "100");
    assert_eq!(trade["size"], "1");
    assert!(trade["id"].is_string());
}
