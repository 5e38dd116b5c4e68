//! # grid_explorer
//!
//! Step-by-step exploration of a uniform square grid from a start cell to an end cell.
//! Four interchangeable strategies are provided:
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search),
//! [greedy best-first](https://en.wikipedia.org/wiki/Best-first_search) and
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm), all using the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) where a heuristic
//! is needed. Movement is restricted to the 4-neighbourhood and every move costs the same.
//!
//! A run calls back into the host after every expansion so the host can draw the current
//! state of the grid or cancel, and returns a [SearchResult] with the path and the
//! metrics needed to compare strategies. [compare] runs several strategies on independent
//! copies of one configuration and [metrics] turns results into rows of an append-only
//! CSV file.
//!
//! ```
//! use grid_explorer::{SearchGrid, Strategy, Role};
//! use grid_util::point::Point;
//! use std::ops::ControlFlow;
//!
//! let mut grid = SearchGrid::new(5, 500).unwrap();
//! let (start, end) = (Point::new(0, 0), Point::new(4, 4));
//! grid.set_role(start, Role::Start).unwrap();
//! grid.set_role(end, Role::End).unwrap();
//! grid.set_role(Point::new(1, 1), Role::Barrier).unwrap();
//! grid.refresh_adjacency();
//!
//! let result = Strategy::BreadthFirst
//!     .run(&mut grid, start, end, |_| ControlFlow::Continue(()))
//!     .unwrap();
//! assert_eq!(result.steps, 9);
//! ```
pub mod compare;
pub mod config;
pub mod error;
pub mod metrics;
pub mod search_grid;
pub mod solver;

use grid_util::point::Point;

pub use error::{GridError, MetricsError, SearchFailure};
pub use search_grid::{Marker, Role, SearchGrid};
pub use solver::{AstarOptions, SearchResult, Strategy};

/// Width in pixels of the drawing surface when none is given.
pub const DEFAULT_PIXEL_SIZE: usize = 800;

/// `|Δrow| + |Δcol|` between two cells.
pub fn manhattan_distance(a: &Point, b: &Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan() {
        assert_eq!(manhattan_distance(&Point::new(0, 0), &Point::new(4, 4)), 8);
        assert_eq!(manhattan_distance(&Point::new(3, 1), &Point::new(1, 2)), 3);
    }
}
