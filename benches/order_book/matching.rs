use criterion::{BenchmarkId, Criterion};
use clob::{OrderBook, Side};
use rust_decimal::Decimal;
use std::hint::black_box;

/// `levels` ask levels of `orders_per_level` unit orders each, from 1000 up.
fn ask_ladder(levels: usize, orders_per_level: usize) -> OrderBook {
    let mut book = OrderBook::new("BENCH");
    for level in 0..levels {
        let price = Decimal::from(1000 + level as i64);
        for _ in 0..orders_per_level {
            let _ = book.submit_limit_order("maker", Side::Ask, Decimal::ONE, price);
        }
    }
    book
}

pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderBook - Matching");

    group.bench_function("place_limit_order_1000_levels", |b| {
        b.iter_with_setup(
            || OrderBook::new("BENCH"),
            |mut book| {
                for i in 0..1000i64 {
                    let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
                    let price = Decimal::from(10_000 + i);
                    black_box(book.submit_limit_order("maker", side, Decimal::ONE, price))
                        .ok();
                }
                book
            },
        );
    });

    // sweep size expressed in levels of 10 orders each
    for &levels in &[1usize, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("market_order_sweep", levels),
            &levels,
            |b, &levels| {
                b.iter_with_setup(
                    || ask_ladder(200, 10),
                    |mut book| {
                        let size = Decimal::from((levels * 10) as i64);
                        let result = book.submit_market_order("taker", Side::Bid, size);
                        assert!(result.is_ok());
                        black_box(result)
                    },
                );
            },
        );
    }

    group.bench_function("rejected_market_order", |b| {
        let mut book = ask_ladder(10, 10);
        let size = Decimal::from(1_000);
        b.iter(|| black_box(book.submit_market_order("taker", Side::Bid, size)).is_err());
    });

    group.bench_function("best_price", |b| {
        let book = ask_ladder(1000, 1);
        b.iter(|| black_box(book.best_price(black_box(Side::Ask))));
    });

    group.finish();
}
