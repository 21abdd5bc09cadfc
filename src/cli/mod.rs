//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Lodestar using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Lodestar - staging to star-schema warehouse ETL
#[derive(Parser, Debug)]
#[command(name = "lodestar")]
#[command(version, about, long_about = None)]
#[command(author = "Lodestar Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lodestar.toml", env = "LODESTAR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LODESTAR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: extract, transform, load
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
