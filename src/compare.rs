use std::ops::ControlFlow;

use grid_util::point::Point;
use log::{debug, info, warn};
use rand::Rng;

use crate::error::{GridError, SearchFailure};
use crate::search_grid::{Role, SearchGrid};
use crate::solver::{AstarOptions, SearchResult, Strategy};

/// Attempts made by [Scenario::random] to draw a configuration in which the end can be
/// reached from the start.
const MAX_LAYOUT_ATTEMPTS: usize = 100;

/// One logical configuration: a grid with its roles set and adjacency refreshed, plus the
/// cells to search between.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub grid: SearchGrid,
    pub start: Point,
    pub end: Point,
}

impl Scenario {
    /// Builds a scenario from an ASCII map with exactly one `S` and one `E`.
    pub fn from_ascii(map: &str, pixel_size: usize) -> Result<Scenario, GridError> {
        let grid = SearchGrid::parse_ascii(map, pixel_size)?;
        let missing = |what: &str| GridError::Parse {
            line: 0,
            reason: format!("map has no {} cell", what),
        };
        let start = grid.find_role(Role::Start).ok_or_else(|| missing("start"))?;
        let end = grid.find_role(Role::End).ok_or_else(|| missing("end"))?;
        Ok(Scenario { grid, start, end })
    }

    /// Draws a random configuration: the start in the top-left quadrant, the end in the
    /// bottom-right one, and every other cell a barrier with probability `density`.
    /// Layouts are redrawn until the end is reachable or the attempts run out, in which
    /// case the last layout is returned as is.
    ///
    /// `size` must be at least 2 and `density` a finite probability in `[0, 1]`.
    pub fn random<R: Rng>(
        size: usize,
        pixel_size: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Scenario, GridError> {
        if size < 2 {
            return Err(GridError::InvalidScenario {
                reason: format!("a {}x{} grid has no room for distinct start and end", size, size),
            });
        }
        if !(0.0..=1.0).contains(&density) {
            return Err(GridError::InvalidScenario {
                reason: format!("barrier density {} is not in [0, 1]", density),
            });
        }
        let mut grid = SearchGrid::new(size, pixel_size)?;
        let half = size / 2;
        let mut layout = None;
        for attempt in 0..MAX_LAYOUT_ATTEMPTS {
            grid.reset();
            let start = Point::new(rng.gen_range(0..half) as i32, rng.gen_range(0..half) as i32);
            let end = Point::new(
                rng.gen_range(size - half..size) as i32,
                rng.gen_range(size - half..size) as i32,
            );
            for p in grid.points().collect::<Vec<_>>() {
                if p != start && p != end && rng.gen_bool(density) {
                    grid.set_role(p, Role::Barrier)?;
                }
            }
            grid.set_role(start, Role::Start)?;
            grid.set_role(end, Role::End)?;
            grid.update();
            layout = Some((start, end));
            if grid.reachable(&start, &end) {
                debug!("Reachable layout found after {} attempts", attempt + 1);
                break;
            }
        }
        let (start, end) = layout.ok_or(GridError::EmptyGrid)?;
        if grid.unreachable(&start, &end) {
            warn!(
                "No reachable layout in {} attempts, keeping the last one",
                MAX_LAYOUT_ATTEMPTS
            );
        }
        grid.refresh_adjacency();
        Ok(Scenario { grid, start, end })
    }
}

/// Outcome of one strategy in a comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub strategy: Strategy,
    pub outcome: Result<SearchResult, SearchFailure>,
}

/// Runs every strategy in `strategies` on its own fresh copy of the scenario's grid, so
/// no run observes markers of another. `on_step` receives the strategy being run along
/// with the grid it works on.
pub fn compare<F>(
    scenario: &Scenario,
    strategies: &[Strategy],
    options: AstarOptions,
    mut on_step: F,
) -> Vec<Comparison>
where
    F: FnMut(Strategy, &SearchGrid) -> ControlFlow<()>,
{
    strategies
        .iter()
        .map(|&strategy| {
            let mut grid = scenario.grid.fresh_copy();
            let outcome = strategy.run_with(
                &mut grid,
                scenario.start,
                scenario.end,
                options,
                |g| on_step(strategy, g),
            );
            match &outcome {
                Ok(result) => debug!(
                    "{}: {} steps, {} expanded",
                    strategy, result.steps, result.expanded_nodes
                ),
                Err(failure) => info!("{}: {}", strategy, failure),
            }
            Comparison { strategy, outcome }
        })
        .collect()
}
