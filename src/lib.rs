// Lodestar - Staging to Star-Schema Warehouse ETL Tool
// Copyright (c) 2025 Lodestar Contributors
// Licensed under the MIT License

//! # Lodestar - healthcare staging to star-schema warehouse ETL
//!
//! Lodestar is an ETL tool built in Rust that rebuilds raw operational
//! healthcare records (providers, patients, encounters, conditions,
//! procedures, organizations, hospital-readmission measures) into a
//! dimensional warehouse: conformed dimension tables, fact tables with
//! derived metrics, and pre-aggregated marts.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** raw entity batches from a PostgreSQL staging database
//! - **Transforming** them into dimensions, facts, and marts with
//!   explicit, best-effort coercion rules
//! - **Loading** the table set into an analytical warehouse with
//!   whole-table-replace semantics, falling back to local Parquet files
//!   when the warehouse is unavailable
//!
//! ## Architecture
//!
//! Lodestar follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, load contract, orchestration)
//! - [`adapters`] - External integrations (staging source, warehouse,
//!   Parquet fallback)
//! - [`domain`] - Typed tables, error taxonomy, owned table set
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lodestar::adapters::parquet::ParquetSink;
//! use lodestar::adapters::staging::PostgresStagingSource;
//! use lodestar::config::load_config;
//! use lodestar::core::load::Loader;
//! use lodestar::core::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("lodestar.toml")?;
//!     let source = PostgresStagingSource::new(&config.staging)?;
//!     let loader = Loader::new(None, ParquetSink::new(config.fallback.directory.clone()));
//!
//!     let summary = Pipeline::new(Box::new(source), loader).run().await?;
//!     println!("Built {} tables", summary.tables.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Null-handling policy
//!
//! The transform stage is deliberately best-effort: unparsable timestamps
//! become null (the row is kept, but drops out of date-joined marts) and
//! unparsable numerics become zero. Only a structurally missing column
//! fails a builder. See [`core::transform::coerce`] for the rules.
//!
//! ## Logging
//!
//! Lodestar uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting pipeline");
//! warn!(table = "fact_encounters", "Unparsable start timestamps present");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
