use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::error::MetricsError;
use crate::solver::SearchResult;

/// How the run that produced a record was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Interactive,
    Automated,
}

/// One row of the metrics table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub path: String,
    pub elapsed_time_seconds: f64,
    pub steps: usize,
    pub manhattan_distance: usize,
    pub expanded_nodes: usize,
    pub algorithm_name: &'static str,
    pub run_mode: RunMode,
    pub run_id: u64,
}

impl MetricsRecord {
    pub fn new(result: &SearchResult, run_mode: RunMode, run_id: u64) -> MetricsRecord {
        let path = result
            .path
            .iter()
            .map(|p| format!("({}, {})", p.x, p.y))
            .join(", ");
        MetricsRecord {
            path: format!("[{}]", path),
            elapsed_time_seconds: result.elapsed.as_secs_f64(),
            steps: result.steps,
            manhattan_distance: result.manhattan_distance,
            expanded_nodes: result.expanded_nodes,
            algorithm_name: result.algorithm.name(),
            run_mode,
            run_id,
        }
    }
}

/// An append-only store of [MetricsRecord]s.
pub trait MetricsSink {
    fn append(&mut self, record: &MetricsRecord) -> Result<(), MetricsError>;

    fn flush(&mut self) -> Result<(), MetricsError> {
        Ok(())
    }
}

/// Writes records as CSV rows. The header is written only when the underlying file
/// starts out empty.
pub struct CsvMetricsSink<W: io::Write> {
    writer: csv::Writer<W>,
    next_run_id: u64,
}

/// Largest `run_id` found in an existing metrics file.
fn last_run_id(path: &Path) -> Result<Option<u64>, MetricsError> {
    let mut reader = csv::Reader::from_path(path)?;
    let Some(column) = reader.headers()?.iter().position(|h| h == "run_id") else {
        return Ok(None);
    };
    let mut last = None;
    for record in reader.records() {
        let id = record?.get(column).and_then(|v| v.parse::<u64>().ok());
        last = last.max(id);
    }
    Ok(last)
}

impl CsvMetricsSink<std::fs::File> {
    /// Opens `path` for appending, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MetricsError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        let fresh = file.metadata()?.len() == 0;
        let next_run_id = if fresh {
            0
        } else {
            last_run_id(path.as_ref())?.map_or(0, |id| id + 1)
        };
        debug!(
            "Appending metrics to {} (new file: {}, next run id: {})",
            path.as_ref().display(),
            fresh,
            next_run_id
        );
        Ok(CsvMetricsSink {
            writer: csv::WriterBuilder::new()
                .has_headers(fresh)
                .from_writer(file),
            next_run_id,
        })
    }
}

impl<W: io::Write> CsvMetricsSink<W> {
    /// Wraps an arbitrary writer; the header is always written before the first row.
    pub fn from_writer(writer: W) -> Self {
        CsvMetricsSink {
            writer: csv::Writer::from_writer(writer),
            next_run_id: 0,
        }
    }

    /// First run id not yet used by the store, so ids keep increasing across sessions
    /// appending to the same file.
    pub fn next_run_id(&self) -> u64 {
        self.next_run_id
    }

    pub fn into_inner(self) -> Result<W, MetricsError> {
        self.writer
            .into_inner()
            .map_err(|e| MetricsError::Io(e.into_error()))
    }
}

impl<W: io::Write> MetricsSink for CsvMetricsSink<W> {
    fn append(&mut self, record: &MetricsRecord) -> Result<(), MetricsError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MetricsError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Strategy;
    use grid_util::point::Point;
    use std::time::Duration;

    fn result() -> SearchResult {
        SearchResult {
            path: vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)],
            elapsed: Duration::from_millis(250),
            steps: 3,
            manhattan_distance: 2,
            expanded_nodes: 4,
            algorithm: Strategy::GreedyBestFirst,
        }
    }

    #[test]
    fn record_fields() {
        let record = MetricsRecord::new(&result(), RunMode::Automated, 7);
        assert_eq!(record.path, "[(0, 0), (0, 1), (1, 1)]");
        assert_eq!(record.elapsed_time_seconds, 0.25);
        assert_eq!(record.algorithm_name, "Greedy_BFS");
    }

    #[test]
    fn csv_rows() {
        let mut sink = CsvMetricsSink::from_writer(Vec::new());
        sink.append(&MetricsRecord::new(&result(), RunMode::Interactive, 1))
            .unwrap();
        sink.append(&MetricsRecord::new(&result(), RunMode::Automated, 2))
            .unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "path,elapsed_time_seconds,steps,manhattan_distance,expanded_nodes,algorithm_name,run_mode,run_id"
        );
        assert_eq!(lines[1], "\"[(0, 0), (0, 1), (1, 1)]\",0.25,3,2,4,Greedy_BFS,interactive,1");
        assert_eq!(lines[2], "\"[(0, 0), (0, 1), (1, 1)]\",0.25,3,2,4,Greedy_BFS,automated,2");
    }

    /// Reopening an existing file appends rows without repeating the header and continues
    /// numbering runs after the last one stored.
    #[test]
    fn append_to_existing_file() {
        let path = std::env::temp_dir().join(format!(
            "grid_explorer_metrics_{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let mut first_ids = Vec::new();
        for _ in 0..3 {
            let mut sink = CsvMetricsSink::open(&path).unwrap();
            let first = sink.next_run_id();
            first_ids.push(first);
            // Two runs per session, each with a row per strategy.
            for run_id in first..first + 2 {
                for _ in 0..2 {
                    sink.append(&MetricsRecord::new(&result(), RunMode::Automated, run_id))
                        .unwrap();
                }
            }
            sink.flush().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(first_ids, vec![0, 2, 4]);
        assert_eq!(text.lines().count(), 13);
        assert_eq!(text.matches("run_id").count(), 1);
        assert!(text.lines().last().unwrap().ends_with(",automated,5"));
    }
}
