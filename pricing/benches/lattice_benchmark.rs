// https://bheisler.github.io/criterion.rs/book/getting_started.html

extern crate pricing;
use pricing::{BlackScholesMerton, ContractParameters, CoxRossRubinstein, OptionPricer};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

criterion_group!(benches, criterion_lattice_pricing);
criterion_main!(benches);

fn reference() -> ContractParameters {
    ContractParameters::new(100.0, 100.0, 1.0, 0.05, 0.2)
}

pub fn criterion_lattice_pricing(c: &mut Criterion) {
    let dp = reference();

    let mut group = c.benchmark_group("European option pricing");

    group.bench_function("black scholes closed form", |b| {
        b.iter(|| BlackScholesMerton.price(black_box(&dp)))
    });

    for nr_intervals in [100, 1_000, 10_000, 100_000] {
        let pricer = CoxRossRubinstein::new(nr_intervals);
        group.bench_with_input(
            BenchmarkId::new("crr lattice serial", nr_intervals),
            &pricer,
            |b, pricer| b.iter(|| pricer.price_serial(black_box(&dp))),
        );
        group.bench_with_input(
            BenchmarkId::new("crr lattice parallel", nr_intervals),
            &pricer,
            |b, pricer| b.iter(|| pricer.price_parallel(black_box(&dp))),
        );
    }

    group.finish()
}
