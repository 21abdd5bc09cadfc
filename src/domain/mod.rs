//! Domain models and types for Lodestar.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Raw staging batches** ([`RawTable`], [`RawBatchSet`]) — untyped,
//!   string-rendered tables as the extraction connector delivers them
//! - **Typed warehouse rows** — dimensions ([`DimProvider`],
//!   [`DimPatient`], [`DimCondition`], [`DimDate`]), facts
//!   ([`FactEncounter`], [`FactProcedure`], [`FactReadmission`]), and
//!   marts ([`ProviderProductivity`], [`AppointmentAnalytics`])
//! - **The owned table set** ([`WarehouseTables`]) passed by value from
//!   the transform phase to the load phase
//! - **Error types** ([`LodestarError`], [`SourceError`],
//!   [`WarehouseError`]) and the [`Result`] alias
//!
//! # Error handling
//!
//! All fallible operations return [`Result<T, LodestarError>`](Result):
//!
//! ```rust
//! use lodestar::domain::{LodestarError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(LodestarError::Configuration("missing dataset id".to_string()))
//! }
//! ```

pub mod batch;
pub mod dimensions;
pub mod errors;
pub mod facts;
pub mod marts;
pub mod result;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use batch::{RawBatchSet, RawRow, RawTable, ENTITY_NAMES};
pub use dimensions::{DimCondition, DimDate, DimPatient, DimProvider};
pub use errors::{LodestarError, SourceError, WarehouseError};
pub use facts::{FactEncounter, FactProcedure, FactReadmission};
pub use marts::{AppointmentAnalytics, ProviderProductivity};
pub use result::Result;
pub use warehouse::{NamedBatch, WarehouseTables, TABLE_NAMES};
