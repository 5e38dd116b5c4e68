use std::ops::ControlFlow;

use grid_util::point::Point;

use crate::error::SearchFailure;
use crate::search_grid::SearchGrid;
use crate::solver::frontier::{discovery_search, Frontier};
use crate::solver::{SearchResult, Strategy};

#[derive(Default)]
struct LifoFrontier(Vec<Point>);

impl Frontier for LifoFrontier {
    fn insert(&mut self, node: Point, _end: Point) {
        self.0.push(node);
    }

    fn next(&mut self) -> Option<Point> {
        self.0.pop()
    }
}

/// Depth-first search. Follows the most recently discovered cell, so paths can wind far
/// away from the shortest route.
pub fn run<F>(
    grid: &mut SearchGrid,
    start: Point,
    end: Point,
    on_step: &mut F,
) -> Result<SearchResult, SearchFailure>
where
    F: FnMut(&SearchGrid) -> ControlFlow<()>,
{
    discovery_search(
        grid,
        start,
        end,
        Strategy::DepthFirst,
        LifoFrontier::default(),
        on_step,
    )
}

#[cfg(test)]
mod tests {
    use crate::solver::tests::{points, solve, OPEN_5};
    use crate::solver::Strategy;

    /// The last neighbour pushed is the one to the right, so the walk sweeps row by row.
    #[test]
    fn open_grid_snakes() {
        let result = solve(OPEN_5, Strategy::DepthFirst).unwrap();
        assert_eq!(
            result.path,
            points(&[
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 4),
                (2, 4),
                (2, 3),
                (2, 2),
                (2, 1),
                (2, 0),
                (3, 0),
                (4, 0),
                (4, 1),
                (4, 2),
                (4, 3),
                (4, 4)
            ])
        );
        assert_eq!(result.expanded_nodes, 17);
        assert!(result.steps > solve(OPEN_5, Strategy::BreadthFirst).unwrap().steps);
    }
}
