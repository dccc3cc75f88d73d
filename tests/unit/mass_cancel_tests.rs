//! Integration tests for mass cancel operations.

use clob::{OrderBook, Side};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn new_book() -> OrderBook {
    OrderBook::new("TEST")
}

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

// ---------------------------------------------------------------------------
// cancel_all_orders
// ---------------------------------------------------------------------------

#[test]
fn cancel_all_on_empty_book_returns_zero() {
    let mut book = new_book();
    let result = book.cancel_all_orders();
    assert_eq!(result.canceled_count(), 0);
    assert!(result.canceled_order_ids().is_empty());
    assert!(result.is_empty());
}

#[test]
fn cancel_all_removes_every_level() {
    let mut book = new_book();
    for price in 95..100 {
        book.submit_limit_order("m", Side::Bid, d(1), d(price)).unwrap();
        book.submit_limit_order("m", Side::Ask, d(1), d(price + 10))
            .unwrap();
    }

    let result = book.cancel_all_orders();

    assert_eq!(result.canceled_count(), 10);
    assert_eq!(book.order_count(), 0);
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
    assert!(book.check_invariants());
}

#[test]
fn cancel_all_then_market_order_is_rejected() {
    let mut book = new_book();
    book.submit_limit_order("m", Side::Ask, d(5), d(100)).unwrap();
    let _ = book.cancel_all_orders();
    assert!(book.submit_market_order("t", Side::Bid, d(1)).is_err());
}

// ---------------------------------------------------------------------------
// cancel_orders_by_side
// ---------------------------------------------------------------------------

#[test]
fn cancel_by_side_only_touches_that_side() {
    let mut book = new_book();
    let bid = book.submit_limit_order("a", Side::Bid, d(3), d(99)).unwrap();
    book.submit_limit_order("a", Side::Ask, d(3), d(101)).unwrap();
    book.submit_limit_order("b", Side::Ask, d(4), d(102)).unwrap();

    let result = book.cancel_orders_by_side(Side::Ask);

    assert_eq!(result.canceled_count(), 2);
    assert_eq!(book.asks_total_volume(), d(0));
    assert!(book.contains_order(bid));
}

// ---------------------------------------------------------------------------
// cancel_orders_by_user
// ---------------------------------------------------------------------------

#[test]
fn cancel_by_user_keeps_other_users_in_queue_order() {
    let mut book = new_book();
    book.submit_limit_order("alice", Side::Bid, d(1), d(100)).unwrap();
    let bob = book.submit_limit_order("bob", Side::Bid, d(2), d(100)).unwrap();
    book.submit_limit_order("alice", Side::Bid, d(3), d(100)).unwrap();
    let carol = book.submit_limit_order("carol", Side::Bid, d(4), d(100))
        .unwrap();

    let result = book.cancel_orders_by_user("alice");
    assert_eq!(result.canceled_count(), 2);

    let limit = book.get_limit(Side::Bid, d(100)).unwrap();
    let ids: Vec<_> = limit.orders().map(|o| o.id()).collect();
    assert_eq!(ids, vec![bob, carol]);
    assert_eq!(limit.total_volume(), d(6));
}

#[test]
fn cancel_by_unknown_user_is_noop() {
    let mut book = new_book();
    book.submit_limit_order("alice", Side::Bid, d(1), d(100)).unwrap();
    let result = book.cancel_orders_by_user("mallory");
    assert!(result.is_empty());
    assert_eq!(book.order_count(), 1);
}
