use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::metrics::RunMode;
use crate::solver::{AstarOptions, Strategy};
use crate::DEFAULT_PIXEL_SIZE;

/// Strategy selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    AStar,
    Bfs,
    Dfs,
    Greedy,
    All,
}

impl Algorithm {
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            Algorithm::AStar => vec![Strategy::AStar],
            Algorithm::Bfs => vec![Strategy::BreadthFirst],
            Algorithm::Dfs => vec![Strategy::DepthFirst],
            Algorithm::Greedy => vec![Strategy::GreedyBestFirst],
            Algorithm::All => Strategy::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Rows (and columns) of randomly generated grids
    #[arg(long, default_value_t = 20, value_parser = parse_grid_size)]
    pub grid_size: usize,

    /// Width of the drawing surface in pixels
    #[arg(long, default_value_t = DEFAULT_PIXEL_SIZE)]
    pub pixel_size: usize,

    /// Probability of a random cell being a barrier
    #[arg(long, default_value_t = 0.3, value_parser = parse_density)]
    pub barrier_density: f64,

    /// Number of configurations to run in automated mode
    #[arg(long, default_value_t = 10)]
    pub runs: u64,

    /// Seed for reproducible random grids
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Algorithm::All)]
    pub algorithm: Algorithm,

    /// Re-queue frontier cells whose cost improves instead of keeping their first priority
    #[arg(long, default_value_t = false)]
    pub requeue_improved: bool,

    /// CSV file the metrics are appended to
    #[arg(long, default_value = "data.csv")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = RunMode::Automated)]
    pub mode: RunMode,

    /// ASCII map (S, E, #, .) to run instead of random grids
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Print the grid after every step (always on in interactive mode)
    #[arg(long, default_value_t = false)]
    pub render: bool,

    /// Pause between rendered steps
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
}

fn parse_grid_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{}", e))?;
    if size >= 2 {
        Ok(size)
    } else {
        Err(format!("{} rows leave no room for distinct start and end cells", size))
    }
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("{} is not a probability in [0, 1]", s))
    }
}

impl Config {
    pub fn astar_options(&self) -> AstarOptions {
        AstarOptions {
            requeue_improved: self.requeue_improved,
        }
    }
}
