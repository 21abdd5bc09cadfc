//! The load contract
//!
//! Loading is an explicit two-step operation: attempt the primary
//! warehouse, inspect the outcome, and invoke the local Parquet fallback
//! only on a failure outcome — no exception-style control flow. A run
//! succeeds only if every table completes its write to at least one of
//! the two destinations; a fallback failure is fatal.

use crate::adapters::parquet::ParquetSink;
use crate::adapters::warehouse::WarehouseClient;
use crate::domain::errors::WarehouseError;
use crate::domain::result::Result;
use crate::domain::warehouse::NamedBatch;

/// Where a run's tables ultimately landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDestination {
    /// Every table was written to the analytical warehouse.
    Warehouse,
    /// Every table was written as local Parquet files.
    LocalParquet,
}

impl std::fmt::Display for LoadDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadDestination::Warehouse => write!(f, "warehouse"),
            LoadDestination::LocalParquet => write!(f, "local parquet"),
        }
    }
}

/// Loader owning the primary sink (when configured) and the fallback.
pub struct Loader {
    warehouse: Option<WarehouseClient>,
    fallback: ParquetSink,
}

impl Loader {
    /// Create a loader. `warehouse` is `None` when the primary sink is
    /// not configured, in which case every run goes straight to Parquet.
    pub fn new(warehouse: Option<WarehouseClient>, fallback: ParquetSink) -> Self {
        Self { warehouse, fallback }
    }

    /// Load every table to the warehouse or, failing that, to Parquet.
    ///
    /// The warehouse attempt stops at its first failed table; the
    /// fallback then rewrites **all** tables so the local directory holds
    /// a complete, consistent set. Tables the warehouse accepted before
    /// the failure remain there (writes are table-scoped, not
    /// run-scoped).
    ///
    /// # Errors
    ///
    /// Returns an error only if the fallback itself fails.
    pub async fn load_all(&self, tables: &[NamedBatch]) -> Result<LoadDestination> {
        match &self.warehouse {
            Some(client) => match self.try_warehouse(client, tables).await {
                Ok(()) => Ok(LoadDestination::Warehouse),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Warehouse load failed, falling back to local parquet storage"
                    );
                    self.fallback.write_all(tables)?;
                    Ok(LoadDestination::LocalParquet)
                }
            },
            None => {
                tracing::info!("Warehouse not configured, using local parquet storage");
                self.fallback.write_all(tables)?;
                Ok(LoadDestination::LocalParquet)
            }
        }
    }

    /// Attempt the primary destination for the whole table set.
    async fn try_warehouse(
        &self,
        client: &WarehouseClient,
        tables: &[NamedBatch],
    ) -> std::result::Result<(), WarehouseError> {
        client.ensure_dataset_exists().await?;
        for table in tables {
            client.replace_table(table).await?;
        }
        Ok(())
    }
}
