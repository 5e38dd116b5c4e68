use criterion::{criterion_group, criterion_main, Criterion};
use grid_explorer::compare::Scenario;
use grid_explorer::{AstarOptions, Strategy};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use std::ops::ControlFlow;

const N_SCENARIOS: usize = 16;

fn scenarios(size: usize) -> Vec<Scenario> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..N_SCENARIOS)
        .filter_map(|_| Scenario::random(size, 800, 0.3, &mut rng).ok())
        .collect()
}

fn random_bench_strategy(c: &mut Criterion, strategy: Strategy, options: AstarOptions) {
    for size in [32, 64] {
        let scenarios = scenarios(size);
        let options_str = if options.requeue_improved {
            " (requeue)"
        } else {
            ""
        };
        c.bench_function(
            format!("random {size}x{size}, {strategy}{options_str}").as_str(),
            |b| {
                b.iter(|| {
                    for scenario in &scenarios {
                        let mut grid = scenario.grid.fresh_copy();
                        black_box(strategy.run_with(
                            &mut grid,
                            scenario.start,
                            scenario.end,
                            options,
                            |_| ControlFlow::Continue(()),
                        ))
                        .ok();
                    }
                })
            },
        );
    }
}

fn random_bench(c: &mut Criterion) {
    for strategy in Strategy::ALL {
        random_bench_strategy(c, strategy, AstarOptions::default());
    }
}

fn random_bench_astar_requeue(c: &mut Criterion) {
    random_bench_strategy(
        c,
        Strategy::AStar,
        AstarOptions {
            requeue_improved: true,
        },
    );
}

criterion_group!(benches, random_bench, random_bench_astar_requeue);
criterion_main!(benches);
