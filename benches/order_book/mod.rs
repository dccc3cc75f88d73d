use criterion::Criterion;

mod mass_cancel;
mod matching;

pub fn register_benchmarks(c: &mut Criterion) {
    matching::register_benchmarks(c);
    mass_cancel::register_benchmarks(c);
}
