use std::collections::VecDeque;
use std::ops::ControlFlow;

use grid_util::point::Point;

use crate::error::SearchFailure;
use crate::search_grid::SearchGrid;
use crate::solver::frontier::{discovery_search, Frontier};
use crate::solver::{SearchResult, Strategy};

/// FIFO frontier: cells are expanded in the order they were discovered, which on a
/// uniform grid is non-decreasing distance from the start.
#[derive(Default)]
struct FifoFrontier(VecDeque<Point>);

impl Frontier for FifoFrontier {
    fn insert(&mut self, node: Point, _end: Point) {
        self.0.push_back(node);
    }

    fn next(&mut self) -> Option<Point> {
        self.0.pop_front()
    }
}

/// Breadth-first search. Always returns a path with the fewest possible moves.
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
        Strategy::BreadthFirst,
        FifoFrontier::default(),
        on_step,
    )
}

#[cfg(test)]
mod tests {
    use crate::solver::tests::{points, solve, OPEN_5};
    use crate::solver::Strategy;

    #[test]
    fn open_grid() {
        let result = solve(OPEN_5, Strategy::BreadthFirst).unwrap();
        assert_eq!(
            result.path,
            points(&[
                (0, 0),
                (1, 0),
                (2, 0),
                (3, 0),
                (4, 0),
                (4, 1),
                (4, 2),
                (4, 3),
                (4, 4)
            ])
        );
        assert_eq!(result.steps, 9);
        assert_eq!(result.manhattan_distance, 8);
        assert_eq!(result.expanded_nodes, 25);
    }

    /// Asserts that the optimal 5 cell route around a single barrier is found.
    #[test]
    fn solve_simple_problem() {
        // |S  |
        // | # |
        // |  E|
        let result = solve("S..\n.#.\n..E", Strategy::BreadthFirst).unwrap();
        assert_eq!(result.steps, 5);
    }
}
