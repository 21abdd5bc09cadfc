//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Lodestar configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing, so a returned config is a
        // valid one
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Staging: {}", config.staging.connection_string_safe());
        println!("  Staging Pool Size: {}", config.staging.max_connections);
        match &config.warehouse {
            Some(warehouse) => {
                println!("  Warehouse: {}", warehouse.base_url);
                println!("  Project: {}", warehouse.project_id);
                println!("  Dataset: {}", warehouse.dataset_id);
                println!(
                    "  API Key: {}",
                    if warehouse.api_key.is_some() {
                        "configured"
                    } else {
                        "not configured"
                    }
                );
            }
            None => println!("  Warehouse: not configured (parquet fallback only)"),
        }
        println!("  Fallback Directory: {}", config.fallback.directory);
        println!();
        Ok(0)
    }
}
