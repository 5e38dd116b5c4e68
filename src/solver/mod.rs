use crate::error::SearchFailure;
use crate::manhattan_distance;
use crate::search_grid::{Marker, SearchGrid};
use core::fmt;
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

pub mod astar;
pub mod bfs;
pub mod dfs;
mod frontier;
pub mod greedy;

pub use astar::AstarOptions;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Child to parent links recorded while a strategy discovers cells.
pub type CameFrom = FxIndexMap<Point, Point>;

/// The four exploration strategies. All share the contract of [run](Self::run) and differ
/// only in how their frontier orders the cells it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    AStar,
    BreadthFirst,
    DepthFirst,
    GreedyBestFirst,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::AStar,
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::GreedyBestFirst,
    ];

    /// Identifier written to the metrics store.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::AStar => "A_star",
            Strategy::BreadthFirst => "BFS",
            Strategy::DepthFirst => "DFS",
            Strategy::GreedyBestFirst => "Greedy_BFS",
        }
    }

    /// Explores `grid` from `start` until `end` is popped from the frontier.
    ///
    /// The grid's adjacency has to be current and `start`/`end` have to be distinct open
    /// cells; none of this is checked. `on_step` is called once after every expansion and
    /// once per reconstruction step with the grid in its current state. Returning
    /// [ControlFlow::Break] from an expansion step cancels the run.
    pub fn run<F>(
        self,
        grid: &mut SearchGrid,
        start: Point,
        end: Point,
        on_step: F,
    ) -> Result<SearchResult, SearchFailure>
    where
        F: FnMut(&SearchGrid) -> ControlFlow<()>,
    {
        self.run_with(grid, start, end, AstarOptions::default(), on_step)
    }

    /// Like [run](Self::run), with explicit options for the A* variant.
    pub fn run_with<F>(
        self,
        grid: &mut SearchGrid,
        start: Point,
        end: Point,
        options: AstarOptions,
        mut on_step: F,
    ) -> Result<SearchResult, SearchFailure>
    where
        F: FnMut(&SearchGrid) -> ControlFlow<()>,
    {
        match self {
            Strategy::AStar => astar::run(grid, start, end, options, &mut on_step),
            Strategy::BreadthFirst => bfs::run(grid, start, end, &mut on_step),
            Strategy::DepthFirst => dfs::run(grid, start, end, &mut on_step),
            Strategy::GreedyBestFirst => greedy::run(grid, start, end, &mut on_step),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metrics of one successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Cells from start to end, both included.
    pub path: Vec<Point>,
    /// Wall-clock time from strategy entry until the goal was popped.
    pub elapsed: Duration,
    /// Number of cells in `path`.
    pub steps: usize,
    /// Straight-line Manhattan distance between start and end.
    pub manhattan_distance: usize,
    pub expanded_nodes: usize,
    pub algorithm: Strategy,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Execution time: {:.2?}", self.elapsed)?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Manhattan distance: {}", self.manhattan_distance)?;
        writeln!(f, "Expanded nodes: {}", self.expanded_nodes)?;
        Ok(())
    }
}

/// Bookkeeping shared by all strategies for the duration of one run.
pub(crate) struct SearchRun {
    strategy: Strategy,
    start: Point,
    end: Point,
    started: Instant,
    pub came_from: CameFrom,
    pub expanded_nodes: usize,
}

impl SearchRun {
    /// Starts the clock and clears whatever markers a previous run left behind.
    pub fn begin(grid: &mut SearchGrid, strategy: Strategy, start: Point, end: Point) -> SearchRun {
        let started = Instant::now();
        if grid.adjacency_stale() {
            warn!("{} started on a grid with stale adjacency", strategy);
        }
        grid.reset_markers();
        info!("{} searching from {} to {}", strategy, start, end);
        SearchRun {
            strategy,
            start,
            end,
            started,
            came_from: CameFrom::default(),
            expanded_nodes: 0,
        }
    }

    /// Stops the clock and retraces the path. Called when the goal has been popped.
    pub fn finish<F>(self, grid: &mut SearchGrid, on_step: &mut F) -> SearchResult
    where
        F: FnMut(&SearchGrid) -> ControlFlow<()>,
    {
        let elapsed = self.started.elapsed();
        let path = reconstruct_path(grid, &self.came_from, self.end, on_step);
        info!(
            "{} reached {} in {:.2?}: {} steps, {} expansions",
            self.strategy,
            self.end,
            elapsed,
            path.len(),
            self.expanded_nodes
        );
        SearchResult {
            steps: path.len(),
            path,
            elapsed,
            manhattan_distance: manhattan_distance(&self.start, &self.end) as usize,
            expanded_nodes: self.expanded_nodes,
            algorithm: self.strategy,
        }
    }
}

/// Walks `came_from` backwards from `end` to the cell without a parent, marking every cell
/// [Marker::OnPath] and calling `on_step` once per parent reached. Returns the cells in
/// start to end order.
pub fn reconstruct_path<F>(
    grid: &mut SearchGrid,
    came_from: &CameFrom,
    end: Point,
    on_step: &mut F,
) -> Vec<Point>
where
    F: FnMut(&SearchGrid) -> ControlFlow<()>,
{
    grid.set_marker(end, Marker::OnPath);
    let mut path = vec![end];
    let mut current = end;
    while let Some(&parent) = came_from.get(&current) {
        grid.set_marker(parent, Marker::OnPath);
        // The result is final at this point, a cancellation request has nothing left to stop.
        let _ = on_step(grid);
        path.push(parent);
        current = parent;
    }
    path.reverse();
    debug!("Reconstructed path of {} cells ending at {}", path.len(), end);
    path
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::search_grid::Role;

    pub(crate) fn solve(map: &str, strategy: Strategy) -> Result<SearchResult, SearchFailure> {
        let mut grid: SearchGrid = map.parse().unwrap();
        let start = grid.find_role(Role::Start).unwrap();
        let end = grid.find_role(Role::End).unwrap();
        strategy.run(&mut grid, start, end, |_| ControlFlow::Continue(()))
    }

    pub(crate) fn points(cells: &[(i32, i32)]) -> Vec<Point> {
        cells.iter().map(|&(r, c)| Point::new(r, c)).collect()
    }

    pub(crate) const OPEN_5: &str = "S....\n.....\n.....\n.....\n....E";

    #[test]
    fn names() {
        let names = Strategy::ALL.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(names, vec!["A_star", "BFS", "DFS", "Greedy_BFS"]);
    }

    #[test]
    fn reconstruct_marks_path_and_steps_once_per_parent() {
        let mut grid = SearchGrid::new(3, 30).unwrap();
        let mut came_from = CameFrom::default();
        came_from.insert(Point::new(0, 1), Point::new(0, 0));
        came_from.insert(Point::new(0, 2), Point::new(0, 1));
        came_from.insert(Point::new(1, 0), Point::new(0, 0));
        let mut calls = 0;
        let path = reconstruct_path(&mut grid, &came_from, Point::new(0, 2), &mut |_| {
            calls += 1;
            ControlFlow::Break(())
        });
        assert_eq!(path, points(&[(0, 0), (0, 1), (0, 2)]));
        assert_eq!(calls, 2);
        assert!(path
            .iter()
            .all(|p| grid.marker(*p) == Some(Marker::OnPath)));
        assert_eq!(grid.marker(Point::new(1, 0)), Some(Marker::Unvisited));
    }

    /// The draw hook sees every expansion but the goal pop, then every retraced parent.
    #[test]
    fn hook_call_count() {
        for strategy in Strategy::ALL {
            let mut grid: SearchGrid = OPEN_5.parse().unwrap();
            let mut calls = 0;
            let result = strategy
                .run(&mut grid, Point::new(0, 0), Point::new(4, 4), |_| {
                    calls += 1;
                    ControlFlow::Continue(())
                })
                .unwrap();
            assert_eq!(calls, result.expanded_nodes - 1 + result.steps - 1);
        }
    }

    #[test]
    fn cancellation_stops_after_requested_step() {
        for strategy in Strategy::ALL {
            let mut grid: SearchGrid = OPEN_5.parse().unwrap();
            let mut calls = 0;
            let outcome = strategy.run(&mut grid, Point::new(0, 0), Point::new(4, 4), |_| {
                calls += 1;
                if calls == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
            assert_eq!(outcome, Err(SearchFailure::Cancelled));
            assert_eq!(calls, 3);
        }
    }

    /// Markers left by an earlier run must not influence the next one.
    #[test]
    fn repeated_runs_are_isolated() {
        let mut grid: SearchGrid = OPEN_5.parse().unwrap();
        let (start, end) = (Point::new(0, 0), Point::new(4, 4));
        let first = Strategy::AStar
            .run(&mut grid, start, end, |_| ControlFlow::Continue(()))
            .unwrap();
        let _ = Strategy::DepthFirst.run(&mut grid, start, end, |_| ControlFlow::Continue(()));
        let second = Strategy::AStar
            .run(&mut grid, start, end, |_| ControlFlow::Continue(()))
            .unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(first.expanded_nodes, second.expanded_nodes);
    }

    #[test]
    fn markers_during_run() {
        let mut grid: SearchGrid = OPEN_5.parse().unwrap();
        let mut first_step = None;
        Strategy::BreadthFirst
            .run(&mut grid, Point::new(0, 0), Point::new(4, 4), |g| {
                if first_step.is_none() {
                    first_step = Some(g.to_string());
                }
                ControlFlow::Continue(())
            })
            .unwrap();
        // Roles are drawn over markers, so the start keeps its letter.
        assert_eq!(
            first_step.unwrap(),
            "So...\no....\n.....\n.....\n....E\n"
        );
        assert_eq!(grid.marker(Point::new(0, 0)), Some(Marker::OnPath));
        assert_eq!(grid.marker(Point::new(3, 3)), Some(Marker::Expanded));
    }
}
