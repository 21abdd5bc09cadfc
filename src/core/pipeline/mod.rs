//! Pipeline orchestrator
//!
//! Sequences the three phases — EXTRACT → TRANSFORM → LOAD — each
//! strictly dependent on the prior, with the table set passed by
//! ownership from phase to phase. There is no retry logic here and no
//! concurrency: builders run in sequence, and exactly one writer touches
//! the destination. A failure in any phase aborts the run; tables already
//! written stay written (loads are table-scoped).

pub mod summary;

pub use summary::{PipelineSummary, TableReport};

use crate::adapters::staging::StagingSource;
use crate::core::load::Loader;
use crate::core::transform;
use crate::domain::errors::LodestarError;
use crate::domain::result::Result;
use chrono::Utc;
use std::time::Instant;

/// The phase a run failed in, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Extract,
    Transform,
    Load,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Extract => "extract",
            Phase::Transform => "transform",
            Phase::Load => "load",
        }
    }
}

/// Pipeline orchestrator owning the source, the transform entry point,
/// and the loader.
pub struct Pipeline {
    source: Box<dyn StagingSource>,
    loader: Loader,
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new(source: Box<dyn StagingSource>, loader: Loader) -> Self {
        Self { source, loader }
    }

    /// Execute one full run.
    ///
    /// # Errors
    ///
    /// Returns the failing phase's error; the phase is logged before the
    /// error propagates.
    pub async fn run(&self) -> Result<PipelineSummary> {
        let start_time = Instant::now();
        let mut summary = PipelineSummary::new();

        tracing::info!("Starting pipeline run");

        // ── EXTRACT ──
        let raw = self
            .source
            .fetch_batches()
            .await
            .map_err(|e| fail(Phase::Extract, e))?;
        summary.record_extracted(raw.row_counts());

        // ── TRANSFORM ──
        let today = Utc::now().date_naive();
        let tables =
            transform::transform_all(&raw, today).map_err(|e| fail(Phase::Transform, e))?;
        let batches = tables
            .to_record_batches()
            .map_err(|e| fail(Phase::Transform, e))?;
        summary.record_tables(&batches);

        // ── LOAD ──
        let destination = self
            .loader
            .load_all(&batches)
            .await
            .map_err(|e| fail(Phase::Load, e))?;
        summary.destination = Some(destination);

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

/// Log which phase failed and pass the error through.
fn fail(phase: Phase, error: LodestarError) -> LodestarError {
    tracing::error!(phase = phase.as_str(), error = %error, "Pipeline phase failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Extract.as_str(), "extract");
        assert_eq!(Phase::Transform.as_str(), "transform");
        assert_eq!(Phase::Load.as_str(), "load");
    }
}
