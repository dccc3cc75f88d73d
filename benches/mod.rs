use criterion::{criterion_group, criterion_main};

mod order_book;

use order_book::register_benchmarks as register_order_book_benchmarks;
use serialization::register_benchmarks as register_serialization_benchmarks;

criterion_group!(
    benches,
    register_order_book_benchmarks,
    register_serialization_benchmarks,
);

criterion_main!(benches);
