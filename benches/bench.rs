use criterion::{criterion_group, criterion_main};

mod facet_collectors;

use facet_collectors::bench_facet_collector;

criterion_group!(benches, bench_facet_collector);
criterion_main!(benches);
