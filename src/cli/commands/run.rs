//! Run command implementation
//!
//! This module implements the `run` command: one full
//! extract-transform-load pass from the staging database to the
//! warehouse (or the local Parquet fallback).

use crate::adapters::parquet::ParquetSink;
use crate::adapters::staging::PostgresStagingSource;
use crate::adapters::warehouse::WarehouseClient;
use crate::config::load_config;
use crate::core::load::{LoadDestination, Loader};
use crate::core::pipeline::Pipeline;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip the warehouse and load straight to local parquet files
    #[arg(long)]
    pub local_only: bool,

    /// Override the fallback directory
    #[arg(long)]
    pub fallback_dir: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting pipeline run command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration loading failed");
                eprintln!("Configuration error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Some(dir) = &self.fallback_dir {
            tracing::info!(directory = %dir, "Overriding fallback directory from CLI");
            config.fallback.directory = dir.clone();
        }

        // Build the staging source
        let source = match PostgresStagingSource::new(&config.staging) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create staging source");
                eprintln!("Failed to initialize staging source: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        // Build the primary sink unless a fallback-only run was requested
        let warehouse = if self.local_only {
            tracing::info!("Local-only mode: warehouse sink disabled from CLI");
            None
        } else {
            match &config.warehouse {
                Some(warehouse_config) => match WarehouseClient::new(warehouse_config.clone()) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create warehouse client");
                        eprintln!("Failed to initialize warehouse client: {e}");
                        return Ok(4);
                    }
                },
                None => None,
            }
        };

        let loader = Loader::new(warehouse, ParquetSink::new(config.fallback.directory.clone()));
        let pipeline = Pipeline::new(Box::new(source), loader);

        println!("Running pipeline (staging: {})", config.staging.connection_string_safe());
        println!();

        let summary = match pipeline.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Pipeline run failed");
                eprintln!("Pipeline failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Display summary
        println!("Pipeline Summary:");
        for (entity, rows) in &summary.extracted {
            println!("  extracted {entity}: {rows} rows");
        }
        println!();
        for table in &summary.tables {
            println!(
                "  {}: {} rows, {} cols",
                table.name, table.rows, table.columns
            );
        }
        println!();
        match summary.destination {
            Some(LoadDestination::Warehouse) => println!("Loaded to warehouse"),
            Some(LoadDestination::LocalParquet) => {
                println!("Loaded to local parquet ({})", config.fallback.directory);
            }
            None => {}
        }
        println!("Completed in {:.2}s", summary.duration.as_secs_f64());

        Ok(0)
    }
}
