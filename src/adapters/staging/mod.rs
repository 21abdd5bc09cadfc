//! Staging source adapters
//!
//! The extraction connector is an external collaborator: anything that can
//! hand the pipeline one untyped table per entity name satisfies the
//! contract. This module defines that contract and ships the PostgreSQL
//! implementation used in production.

pub mod postgres;

use crate::domain::batch::RawBatchSet;
use crate::domain::result::Result;
use async_trait::async_trait;

/// A source of raw entity batches.
///
/// Implementations must supply every entity in
/// [`crate::domain::batch::ENTITY_NAMES`]; a missing entity is a fatal
/// source error, raised before any transform work begins.
#[async_trait]
pub trait StagingSource: Send + Sync {
    /// Test that the source can be reached.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Fetch one batch per entity name.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or a required
    /// entity table is absent.
    async fn fetch_batches(&self) -> Result<RawBatchSet>;
}

pub use postgres::PostgresStagingSource;
