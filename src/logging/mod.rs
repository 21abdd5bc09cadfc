//! Logging and observability
//!
//! Structured logging for the pipeline: console output always on, with
//! an optional JSON file layer (rotated daily or hourly) for unattended
//! runs.
//!
//! # Example
//!
//! ```no_run
//! use lodestar::logging::init_logging;
//! use lodestar::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Pipeline started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
