//! PostgreSQL staging source
//!
//! Reads the `stg_*` tables from the staging database using connection
//! pooling. Staging columns are inconsistently typed, so each row is
//! fetched as a single `jsonb` value (`SELECT to_jsonb(t) FROM ... t`)
//! and decoded into an untyped [`RawTable`] — every scalar travels as its
//! string rendering, SQL nulls as null, and typing is deferred to the
//! transform builders.

use crate::adapters::staging::StagingSource;
use crate::config::schema::StagingConfig;
use crate::domain::batch::{RawBatchSet, RawTable, ENTITY_NAMES};
use crate::domain::errors::SourceError;
use crate::domain::result::Result;
use async_trait::async_trait;
use deadpool_postgres::{Config as PoolConfig, Manager, ManagerConfig, Pool, RecyclingMethod};
use std::collections::HashMap;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Staging source backed by a PostgreSQL database of `stg_*` tables.
pub struct PostgresStagingSource {
    /// Connection pool
    pool: Pool,
}

impl PostgresStagingSource {
    /// Create a new PostgreSQL staging source.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool
    /// cannot be created.
    pub fn new(config: &StagingConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config.connection_string.parse().map_err(|e| {
            SourceError::ConnectionFailed(format!("invalid connection string: {e}"))
        })?;

        let mut pool_config = PoolConfig::new();
        pool_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let manager = Manager::from_config(pg_config, NoTls, pool_config.manager.unwrap());

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .build()
            .map_err(|e| SourceError::ConnectionFailed(format!("failed to create pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Fetch one staging table as an untyped batch.
    async fn fetch_entity(&self, entity: &str) -> Result<RawTable> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;

        // Entity names come from the fixed ENTITY_NAMES list, never from
        // user input, so interpolating the table name is safe here.
        let statement = format!("SELECT to_jsonb(t) AS row FROM stg_{entity} t");
        let rows = client.query(&statement, &[]).await.map_err(|e| {
            if is_undefined_table(&e) {
                SourceError::MissingEntity(entity.to_string())
            } else {
                SourceError::QueryFailed(format!("stg_{entity}: {e}"))
            }
        })?;

        let values: Vec<serde_json::Value> = rows.iter().map(|row| row.get("row")).collect();
        let table = RawTable::from_json_rows(values);

        tracing::debug!(entity, rows = table.len(), "Fetched staging table");
        Ok(table)
    }
}

/// PostgreSQL `undefined_table` (42P01) means the staging entity is absent.
fn is_undefined_table(err: &tokio_postgres::Error) -> bool {
    err.code()
        .is_some_and(|code| code == &tokio_postgres::error::SqlState::UNDEFINED_TABLE)
}

#[async_trait]
impl StagingSource for PostgresStagingSource {
    async fn test_connection(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| SourceError::ConnectionFailed(e.to_string()))?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| SourceError::ConnectionFailed(format!("connection test failed: {e}")))?;

        tracing::info!("Staging source connection test successful");
        Ok(())
    }

    async fn fetch_batches(&self) -> Result<RawBatchSet> {
        tracing::info!("Extracting staging tables");

        let mut tables = HashMap::new();
        for entity in ENTITY_NAMES {
            let table = self.fetch_entity(entity).await?;
            tables.insert(entity.to_string(), table);
        }

        let batch = RawBatchSet::from_tables(tables)?;
        for (entity, rows) in batch.row_counts() {
            tracing::info!(entity, rows, "Extracted entity");
        }
        Ok(batch)
    }
}
