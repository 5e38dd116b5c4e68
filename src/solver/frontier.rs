use std::cmp::Ordering;
use std::ops::ControlFlow;

use grid_util::point::Point;
use log::info;

use crate::error::SearchFailure;
use crate::search_grid::{Marker, SearchGrid};
use crate::solver::{SearchResult, SearchRun, Strategy};

/// Heap entry ordered so that [BinaryHeap](std::collections::BinaryHeap) pops the smallest
/// key first, breaking ties by the earlier insertion sequence number.
pub(crate) struct SmallestKeyHolder {
    pub key: i32,
    pub seq: usize,
    pub cost: i32,
    pub node: Point,
}

impl Eq for SmallestKeyHolder {}

impl PartialEq for SmallestKeyHolder {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl PartialOrd for SmallestKeyHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestKeyHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.key.cmp(&self.key) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// The container a discovery search keeps its queued cells in. Only the pop order differs
/// between breadth-first, depth-first and greedy best-first search.
pub(crate) trait Frontier {
    fn insert(&mut self, node: Point, end: Point);
    fn next(&mut self) -> Option<Point>;
}

/// Runs a search that marks cells visited when they are first discovered, so no cell is
/// ever queued twice.
pub(crate) fn discovery_search<Q, F>(
    grid: &mut SearchGrid,
    start: Point,
    end: Point,
    strategy: Strategy,
    mut frontier: Q,
    on_step: &mut F,
) -> Result<SearchResult, SearchFailure>
where
    Q: Frontier,
    F: FnMut(&SearchGrid) -> ControlFlow<()>,
{
    let mut run = SearchRun::begin(grid, strategy, start, end);
    let mut visited = vec![false; grid.size() * grid.size()];
    if let Some(ix) = grid.index(start) {
        visited[ix] = true;
    }
    frontier.insert(start, end);

    while let Some(current) = frontier.next() {
        run.expanded_nodes += 1;
        if current == end {
            return Ok(run.finish(grid, on_step));
        }
        let neighbours = grid.neighbours(current).to_vec();
        for neighbour in neighbours {
            let Some(ix) = grid.index(neighbour) else {
                continue;
            };
            if visited[ix] {
                continue;
            }
            visited[ix] = true;
            run.came_from.insert(neighbour, current);
            frontier.insert(neighbour, end);
            grid.set_marker(neighbour, Marker::Frontier);
        }
        grid.set_marker(current, Marker::Expanded);
        if on_step(grid).is_break() {
            info!("{} cancelled after {} expansions", strategy, run.expanded_nodes);
            return Err(SearchFailure::Cancelled);
        }
    }
    info!(
        "{} exhausted its frontier after {} expansions",
        strategy, run.expanded_nodes
    );
    Err(SearchFailure::NoPathFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_smallest_key_then_oldest() {
        let mut heap = BinaryHeap::new();
        for (key, seq) in [(3, 0), (1, 1), (3, 2), (1, 3), (2, 4)] {
            heap.push(SmallestKeyHolder {
                key,
                seq,
                cost: 0,
                node: Point::new(seq as i32, 0),
            });
        }
        let order = std::iter::from_fn(|| heap.pop().map(|h| h.seq)).collect::<Vec<_>>();
        assert_eq!(order, vec![1, 3, 4, 0, 2]);
    }
}
