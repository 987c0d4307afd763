use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pathsim::prelude::*;

fn simulation_benchmark(c: &mut Criterion) {
    let diffusion = SimulationConfig::new(1_000_000.0, 30, 0.05, 0.2, 10_000);
    let jumps = diffusion.clone().with_jumps(0.2, -0.1, 0.15);
    let simulator = PathSimulator::new().with_seed(1);

    c.bench_function("simulate 10k paths x 30 years", |b| {
        b.iter(|| black_box(simulator.simulate(&diffusion).unwrap()))
    });
    c.bench_function("simulate 10k paths x 30 years with jumps", |b| {
        b.iter(|| black_box(simulator.simulate(&jumps).unwrap()))
    });

    let terminal = simulator.simulate(&diffusion).unwrap().terminal_values();
    c.bench_function("risk metrics over 10k terminal values", |b| {
        b.iter(|| black_box(RiskAnalyzer::analyze(&terminal)))
    });
}
criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
