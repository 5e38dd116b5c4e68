use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use grid_util::point::Point;

use crate::error::SearchFailure;
use crate::manhattan_distance;
use crate::search_grid::SearchGrid;
use crate::solver::frontier::{discovery_search, Frontier, SmallestKeyHolder};
use crate::solver::{SearchResult, Strategy};

/// Frontier ordered by the heuristic alone. Equal estimates pop in insertion order.
#[derive(Default)]
struct HeuristicFrontier {
    heap: BinaryHeap<SmallestKeyHolder>,
    seq: usize,
}

impl Frontier for HeuristicFrontier {
    fn insert(&mut self, node: Point, end: Point) {
        self.heap.push(SmallestKeyHolder {
            key: manhattan_distance(&node, &end),
            seq: self.seq,
            cost: 0,
            node,
        });
        self.seq += 1;
    }

    fn next(&mut self) -> Option<Point> {
        self.heap.pop().map(|h| h.node)
    }
}

/// Greedy best-first search. Ignores the distance already travelled, so it can be lured
/// into dead ends and is not optimal.
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
        Strategy::GreedyBestFirst,
        HeuristicFrontier::default(),
        on_step,
    )
}
