//! Domain error types
//!
//! This module defines the error hierarchy for Lodestar. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Parse defects are deliberately absent from this hierarchy: an unparsable
//! timestamp coerces to null and an unparsable numeric coerces to zero at
//! the row level (see [`crate::core::transform::coerce`]), so that every
//! fact row stays aggregable downstream.

use thiserror::Error;

/// Main Lodestar error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum LodestarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Staging-source errors (connection, query, missing entity)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// A raw table is missing a column a builder cannot work without.
    /// Fatal for the transform phase.
    #[error("Schema defect: raw table '{table}' is missing required column '{column}'")]
    Schema { table: String, column: String },

    /// Warehouse (primary sink) errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Fallback sink errors. Unlike warehouse errors these are fatal:
    /// there is nothing left to fall back to.
    #[error("Fallback sink error: {0}")]
    Fallback(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Staging-source-specific errors
///
/// Errors that occur while reaching or reading the raw batch source.
/// These errors don't expose the underlying database client types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the staging database
    #[error("Failed to connect to staging source: {0}")]
    ConnectionFailed(String),

    /// A staging query failed
    #[error("Staging query failed: {0}")]
    QueryFailed(String),

    /// A required entity table is absent from the source
    #[error("Required entity table '{0}' is absent from the staging source")]
    MissingEntity(String),
}

/// Warehouse-sink-specific errors
///
/// Errors that occur while writing to the primary analytical warehouse.
/// Any of these triggers the local Parquet fallback; none of them is fatal
/// on its own.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Failed to reach the warehouse endpoint
    #[error("Failed to connect to warehouse: {0}")]
    ConnectionFailed(String),

    /// Dataset could not be created or accessed
    #[error("Failed to ensure dataset '{dataset}': {message}")]
    DatasetCreationFailed { dataset: String, message: String },

    /// A whole-table replace write failed
    #[error("Failed to write table '{table}' ({status}): {message}")]
    WriteFailed {
        table: String,
        status: u16,
        message: String,
    },

    /// The warehouse returned something the client could not interpret
    #[error("Invalid response from warehouse: {0}")]
    InvalidResponse(String),

    /// Rows could not be encoded for the wire
    #[error("Failed to encode rows: {0}")]
    Encoding(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for LodestarError {
    fn from(err: std::io::Error) -> Self {
        LodestarError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LodestarError {
    fn from(err: serde_json::Error) -> Self {
        LodestarError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LodestarError {
    fn from(err: toml::de::Error) -> Self {
        LodestarError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lodestar_error_display() {
        let err = LodestarError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::MissingEntity("encounters".to_string());
        let err: LodestarError = source_err.into();
        assert!(matches!(err, LodestarError::Source(_)));
    }

    #[test]
    fn test_warehouse_error_conversion() {
        let wh_err = WarehouseError::WriteFailed {
            table: "fact_encounters".to_string(),
            status: 503,
            message: "unavailable".to_string(),
        };
        let err: LodestarError = wh_err.into();
        assert!(matches!(err, LodestarError::Warehouse(_)));
    }

    #[test]
    fn test_schema_error_names_table_and_column() {
        let err = LodestarError::Schema {
            table: "providers".to_string(),
            column: "provider_id".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("providers"));
        assert!(msg.contains("provider_id"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LodestarError = io_err.into();
        assert!(matches!(err, LodestarError::Io(_)));
    }

    #[test]
    fn test_lodestar_error_implements_std_error() {
        let err = LodestarError::Other("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
