//! Pipeline run summary and reporting
//!
//! Purely observational: nothing in the pipeline branches on these
//! numbers. They exist so an operator can see at a glance what a run
//! produced and where it went.

use crate::core::load::LoadDestination;
use crate::domain::warehouse::NamedBatch;
use std::time::Duration;

/// Row/column counts for one output table.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// Output table name
    pub name: String,

    /// Number of rows built
    pub rows: usize,

    /// Number of columns built
    pub columns: usize,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// (entity, rows) pairs from the extract phase
    pub extracted: Vec<(String, usize)>,

    /// Per-table reports from the transform phase
    pub tables: Vec<TableReport>,

    /// Where the tables landed
    pub destination: Option<LoadDestination>,

    /// Total wall-clock duration of the run
    pub duration: Duration,
}

impl PipelineSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self {
            extracted: Vec::new(),
            tables: Vec::new(),
            destination: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Record the extract-phase row counts.
    pub fn record_extracted(&mut self, counts: Vec<(&'static str, usize)>) {
        self.extracted = counts
            .into_iter()
            .map(|(name, rows)| (name.to_string(), rows))
            .collect();
    }

    /// Record the transform-phase table shapes.
    pub fn record_tables(&mut self, batches: &[NamedBatch]) {
        self.tables = batches
            .iter()
            .map(|b| TableReport {
                name: b.name.to_string(),
                rows: b.rows(),
                columns: b.columns(),
            })
            .collect();
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total rows across all output tables.
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Log the summary at info level.
    pub fn log_summary(&self) {
        for table in &self.tables {
            tracing::info!(
                table = %table.name,
                rows = table.rows,
                columns = table.columns,
                "Table built"
            );
        }
        let destination = self
            .destination
            .map(|d| d.to_string())
            .unwrap_or_else(|| "none".to_string());
        tracing::info!(
            tables = self.tables.len(),
            total_rows = self.total_rows(),
            destination = %destination,
            duration_ms = self.duration.as_millis() as u64,
            "Pipeline completed"
        );
    }
}

impl Default for PipelineSummary {
    fn default() -> Self {
        Self::new()
    }
}
