//! Configuration schema types
//!
//! This module defines the configuration structure for Lodestar. The
//! warehouse section is optional: without it the pipeline loads straight
//! to the local Parquet fallback, which keeps a credential-free
//! development loop possible.

use crate::config::secret::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Main Lodestar configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodestarConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Staging source (PostgreSQL) configuration
    pub staging: StagingConfig,

    /// Analytical warehouse configuration (optional; fallback-only runs
    /// omit it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<WarehouseConfig>,

    /// Local Parquet fallback configuration
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LodestarConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.staging.validate()?;
        if let Some(ref warehouse) = self.warehouse {
            warehouse.validate()?;
        }
        self.fallback.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Staging source (PostgreSQL) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// PostgreSQL connection string for the staging database
    pub connection_string: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connection acquisition timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

impl StagingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.connection_string.is_empty() {
            return Err("staging.connection_string must not be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("staging.max_connections must be at least 1".to_string());
        }
        Ok(())
    }

    /// The connection string with any password redacted, safe to log.
    pub fn connection_string_safe(&self) -> String {
        self.connection_string
            .split('@')
            .next_back()
            .map(|s| format!("postgresql://***@{s}"))
            .unwrap_or_else(|| "postgresql://***".to_string())
    }
}

/// Analytical warehouse configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Base URL of the warehouse REST endpoint
    pub base_url: String,

    /// Project the dataset lives under
    pub project_id: String,

    /// Dataset the tables land in
    #[serde(default = "default_dataset_id")]
    pub dataset_id: String,

    /// Bearer token for the warehouse API (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_warehouse_timeout")]
    pub timeout_seconds: u64,
}

impl WarehouseConfig {
    fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url)
            .map_err(|e| format!("warehouse.base_url '{}' is invalid: {e}", self.base_url))?;
        if self.project_id.is_empty() {
            return Err("warehouse.project_id must not be empty".to_string());
        }
        if self.dataset_id.is_empty() {
            return Err("warehouse.dataset_id must not be empty".to_string());
        }
        Ok(())
    }
}

/// Local Parquet fallback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Directory the fallback files are written under
    #[serde(default = "default_fallback_directory")]
    pub directory: String,
}

impl FallbackConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.is_empty() {
            return Err("fallback.directory must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            directory: default_fallback_directory(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to also write JSON logs to rotating local files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: "daily" or "hourly"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path must not be empty when enabled".to_string());
        }
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> usize {
    4
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_dataset_id() -> String {
    "healthcare".to_string()
}

fn default_warehouse_timeout() -> u64 {
    120
}

fn default_fallback_directory() -> String {
    "data/warehouse".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> LodestarConfig {
        LodestarConfig {
            application: ApplicationConfig::default(),
            staging: StagingConfig {
                connection_string: "postgresql://user:pw@localhost:5432/staging".to_string(),
                max_connections: 4,
                connection_timeout_seconds: 30,
            },
            warehouse: None,
            fallback: FallbackConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_warehouse_url_validated() {
        let mut config = minimal();
        config.warehouse = Some(WarehouseConfig {
            base_url: "not a url".to_string(),
            project_id: "analytics".to_string(),
            dataset_id: "healthcare".to_string(),
            api_key: None,
            timeout_seconds: 120,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_string_safe_redacts_password() {
        let config = minimal();
        let safe = config.staging.connection_string_safe();
        assert!(!safe.contains("pw"));
        assert!(safe.contains("localhost:5432/staging"));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut config = minimal();
        config.staging.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
