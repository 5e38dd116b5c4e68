use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use grid_util::point::Point;
use log::info;

use crate::error::SearchFailure;
use crate::manhattan_distance;
use crate::search_grid::{Marker, SearchGrid};
use crate::solver::frontier::SmallestKeyHolder;
use crate::solver::{SearchResult, SearchRun, Strategy};

/// Tuning of the A* frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AstarOptions {
    /// Push a queued cell again when a cheaper route to it is found. When `false` the cell
    /// keeps the priority it was queued with, only its cost and parent are updated. This
    /// changes expansion counts, and on some larger maps the returned path.
    pub requeue_improved: bool,
}

/// A* with the Manhattan distance as heuristic and uniform step cost 1. Ties on the
/// estimated total are broken by insertion order.
pub fn run<F>(
    grid: &mut SearchGrid,
    start: Point,
    end: Point,
    options: AstarOptions,
    on_step: &mut F,
) -> Result<SearchResult, SearchFailure>
where
    F: FnMut(&SearchGrid) -> ControlFlow<()>,
{
    let mut run = SearchRun::begin(grid, Strategy::AStar, start, end);
    let n = grid.size() * grid.size();
    let mut g_score = vec![i32::MAX; n];
    let mut in_frontier = vec![false; n];
    let mut seq = 0;
    let mut open = BinaryHeap::new();

    if let Some(ix) = grid.index(start) {
        g_score[ix] = 0;
        in_frontier[ix] = true;
    }
    open.push(SmallestKeyHolder {
        key: manhattan_distance(&start, &end),
        seq,
        cost: 0,
        node: start,
    });

    while let Some(SmallestKeyHolder {
        cost, node: current, ..
    }) = open.pop()
    {
        let Some(ci) = grid.index(current) else {
            continue;
        };
        // With requeueing a cell can sit in the heap several times, only the entry
        // matching its best cost is processed.
        if options.requeue_improved && cost > g_score[ci] {
            continue;
        }
        in_frontier[ci] = false;
        run.expanded_nodes += 1;
        if current == end {
            return Ok(run.finish(grid, on_step));
        }

        let tentative = g_score[ci] + 1;
        let neighbours = grid.neighbours(current).to_vec();
        for neighbour in neighbours {
            let Some(ni) = grid.index(neighbour) else {
                continue;
            };
            if tentative >= g_score[ni] {
                continue;
            }
            run.came_from.insert(neighbour, current);
            g_score[ni] = tentative;
            if options.requeue_improved || !in_frontier[ni] {
                seq += 1;
                open.push(SmallestKeyHolder {
                    key: tentative + manhattan_distance(&neighbour, &end),
                    seq,
                    cost: tentative,
                    node: neighbour,
                });
                in_frontier[ni] = true;
                grid.set_marker(neighbour, Marker::Frontier);
            }
        }

        grid.set_marker(current, Marker::Expanded);
        if on_step(grid).is_break() {
            info!("A_star cancelled after {} expansions", run.expanded_nodes);
            return Err(SearchFailure::Cancelled);
        }
    }
    info!(
        "A_star exhausted its frontier after {} expansions",
        run.expanded_nodes
    );
    Err(SearchFailure::NoPathFound)
}
