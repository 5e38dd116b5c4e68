use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::error::Error;
use std::ops::ControlFlow;
use std::time::Duration;

use grid_explorer::compare::{compare, Scenario};
use grid_explorer::config::Config;
use grid_explorer::metrics::{CsvMetricsSink, MetricsRecord, MetricsSink, RunMode};
use grid_explorer::{SearchGrid, Strategy};

#[derive(Default)]
struct Totals {
    solved: usize,
    steps: usize,
    expanded: usize,
    elapsed: Duration,
}

fn render(strategy: Strategy, grid: &SearchGrid, delay: Duration) -> ControlFlow<()> {
    println!("[{}]\n{}", strategy, grid);
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    ControlFlow::Continue(())
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut sink = CsvMetricsSink::open(&config.output)?;
    let strategies = config.algorithm.strategies();
    let delay = Duration::from_millis(config.delay_ms);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fixed = match &config.map {
        Some(path) => Some(Scenario::from_ascii(
            &std::fs::read_to_string(path)?,
            config.pixel_size,
        )?),
        None => None,
    };
    let (runs, render_steps) = match config.mode {
        RunMode::Interactive => (1, true),
        RunMode::Automated => (config.runs, config.render),
    };

    let first_run_id = sink.next_run_id();
    let mut totals: BTreeMap<&'static str, Totals> = BTreeMap::new();
    for run_id in first_run_id..first_run_id + runs {
        let scenario = match &fixed {
            Some(scenario) => scenario.clone(),
            None => Scenario::random(
                config.grid_size,
                config.pixel_size,
                config.barrier_density,
                &mut rng,
            )?,
        };
        info!("Run {}: {} to {}", run_id, scenario.start, scenario.end);
        if render_steps {
            println!("{}", scenario.grid);
        }

        let comparisons = compare(
            &scenario,
            &strategies,
            config.astar_options(),
            |strategy, grid| {
                if render_steps {
                    render(strategy, grid, delay)
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        for comparison in comparisons {
            let entry = totals.entry(comparison.strategy.name()).or_default();
            match comparison.outcome {
                Ok(result) => {
                    if config.mode == RunMode::Interactive {
                        println!("Pathfinding Metrics:\n{}", result);
                    }
                    sink.append(&MetricsRecord::new(&result, config.mode, run_id))?;
                    entry.solved += 1;
                    entry.steps += result.steps;
                    entry.expanded += result.expanded_nodes;
                    entry.elapsed += result.elapsed;
                }
                Err(failure) => println!("{}: {}", comparison.strategy, failure),
            }
        }
    }
    sink.flush()?;
    println!("Metrics saved to {}", config.output.display());

    println!("\n=== COMPARISON ({} runs) ===", runs);
    println!(
        "{:<12} {:>7} {:>10} {:>13} {:>12}",
        "Algorithm", "Solved", "Avg steps", "Avg expanded", "Avg time"
    );
    for (name, t) in &totals {
        let n = t.solved.max(1);
        println!(
            "{:<12} {:>7} {:>10.1} {:>13.1} {:>12.2?}",
            name,
            t.solved,
            t.steps as f64 / n as f64,
            t.expanded as f64 / n as f64,
            t.elapsed / n as u32
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    println!("Grid explorer");
    match &config.map {
        Some(path) => println!("Map: {}", path.display()),
        None => println!(
            "Grid size: {}x{}, barrier density: {}",
            config.grid_size, config.grid_size, config.barrier_density
        ),
    }
    println!("Algorithm: {:?}, mode: {:?}\n", config.algorithm, config.mode);

    if let Err(e) = run(&config) {
        eprintln!("Run failed: {}", e);
        std::process::exit(1);
    }
}
