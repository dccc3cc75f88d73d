use criterion::{BenchmarkId, Criterion};
use clob::{OrderBook, Side};
use rust_decimal::Decimal;
use std::hint::black_box;

fn populated_book(count: usize, bids_only: bool) -> OrderBook {
    let mut book = OrderBook::new("BENCH");
    for i in 0..count {
        let price = Decimal::from(1000 + (i % 500) as i64);
        let side = if bids_only || i % 2 == 0 {
            Side::Bid
        } else {
            Side::Ask
        };
        let user = format!("user{}", i % 10);
        let _ = book.submit_limit_order(user, side, Decimal::TEN, price);
    }
    book
}

/// Register all benchmarks for mass cancel operations.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Mass Cancel");

    for &order_count in &[100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("cancel_all_orders", order_count),
            &order_count,
            |b, &count| {
                b.iter_with_setup(
                    || populated_book(count, false),
                    |mut book| {
                        let result = black_box(book.cancel_all_orders());
                        assert_eq!(result.canceled_count(), count);
                    },
                );
            },
        );
    }

    for &order_count in &[100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("cancel_orders_by_side", order_count),
            &order_count,
            |b, &count| {
                b.iter_with_setup(
                    || populated_book(count, true),
                    |mut book| black_box(book.cancel_orders_by_side(Side::Bid)),
                );
            },
        );
    }

    for &order_count in &[100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("cancel_orders_by_user", order_count),
            &order_count,
            |b, &count| {
                b.iter_with_setup(
                    || populated_book(count, false),
                    |mut book| black_box(book.cancel_orders_by_user("user3")),
                );
            },
        );
    }

    group.finish();
}
