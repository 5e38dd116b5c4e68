use core::fmt;
use grid_util::point::Point;

/// Errors raised by [SearchGrid](crate::search_grid::SearchGrid) mutations and map parsing.
/// These are caller programming errors and are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A position outside the `size`×`size` grid was addressed.
    OutOfBounds { pos: Point, size: usize },
    /// A grid needs at least one row.
    EmptyGrid,
    /// An ASCII map could not be parsed.
    Parse { line: usize, reason: String },
    /// Random scenario parameters that cannot produce a distinct start and end.
    InvalidScenario { reason: String },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds { pos, size } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} grid",
                pos.x, pos.y, size, size
            ),
            GridError::EmptyGrid => write!(f, "grid must have at least one row"),
            GridError::Parse { line, reason } => write!(f, "map line {}: {}", line, reason),
            GridError::InvalidScenario { reason } => write!(f, "invalid scenario: {}", reason),
        }
    }
}

impl std::error::Error for GridError {}

/// Terminal outcomes of a search run that produced no [SearchResult](crate::solver::SearchResult).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// The frontier ran dry before the goal was popped.
    NoPathFound,
    /// The draw hook asked the run to stop.
    Cancelled,
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::NoPathFound => write!(f, "No path found!"),
            SearchFailure::Cancelled => write!(f, "search cancelled"),
        }
    }
}

impl std::error::Error for SearchFailure {}

/// Failures of the metrics sink.
#[derive(Debug)]
pub enum MetricsError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Io(e) => write!(f, "metrics file error: {}", e),
            MetricsError::Csv(e) => write!(f, "metrics encoding error: {}", e),
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Io(e) => Some(e),
            MetricsError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for MetricsError {
    fn from(e: std::io::Error) -> Self {
        MetricsError::Io(e)
    }
}

impl From<csv::Error> for MetricsError {
    fn from(e: csv::Error) -> Self {
        MetricsError::Csv(e)
    }
}
