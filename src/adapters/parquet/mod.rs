//! Local Parquet fallback sink
//!
//! When the warehouse cannot be written, every table lands as a columnar
//! file under a fixed local directory, one `<table>.parquet` per table
//! name. Writing over an existing file replaces it wholesale, preserving
//! the per-table truncate-then-insert contract of the primary sink.

use crate::domain::errors::LodestarError;
use crate::domain::result::Result;
use crate::domain::warehouse::NamedBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Parquet sink writing one file per table under a base directory.
pub struct ParquetSink {
    directory: PathBuf,
}

impl ParquetSink {
    /// Create a sink rooted at `directory`. The directory is created on
    /// first write, not here.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory this sink writes into.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write one table, replacing any prior file for that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written. Fallback failures are fatal for the run.
    pub fn write_table(&self, table: &NamedBatch) -> Result<()> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            LodestarError::Fallback(format!(
                "failed to create {}: {e}",
                self.directory.display()
            ))
        })?;

        let path = self.directory.join(format!("{}.parquet", table.name));
        let file = File::create(&path).map_err(|e| {
            LodestarError::Fallback(format!("failed to create {}: {e}", path.display()))
        })?;

        let properties = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, table.batch.schema(), Some(properties))
            .map_err(|e| LodestarError::Fallback(format!("table '{}': {e}", table.name)))?;
        writer
            .write(&table.batch)
            .map_err(|e| LodestarError::Fallback(format!("table '{}': {e}", table.name)))?;
        writer
            .close()
            .map_err(|e| LodestarError::Fallback(format!("table '{}': {e}", table.name)))?;

        tracing::info!(
            table = table.name,
            rows = table.rows(),
            path = %path.display(),
            "Wrote fallback parquet file"
        );
        Ok(())
    }

    /// Write every table in the set.
    ///
    /// # Errors
    ///
    /// Returns the first write failure; earlier tables may already be on
    /// disk (writes are table-scoped, not run-scoped).
    pub fn write_all(&self, tables: &[NamedBatch]) -> Result<()> {
        for table in tables {
            self.write_table(table)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::warehouse::WarehouseTables;

    #[test]
    fn test_write_all_creates_one_file_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ParquetSink::new(dir.path().join("warehouse"));
        let batches = WarehouseTables::default().to_record_batches().unwrap();

        sink.write_all(&batches).unwrap();

        let mut files: Vec<String> = std::fs::read_dir(dir.path().join("warehouse"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files.len(), batches.len());
        assert!(files.contains(&"fact_encounters.parquet".to_string()));
    }

    #[test]
    fn test_rewrite_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ParquetSink::new(dir.path());

        let tables = WarehouseTables {
            dim_conditions: vec![crate::domain::dimensions::DimCondition {
                condition_key: "E11".to_string(),
                code: "E11".to_string(),
                description: None,
            }],
            ..Default::default()
        };
        let batches = tables.to_record_batches().unwrap();
        let conditions = batches
            .iter()
            .find(|b| b.name == "dim_conditions")
            .unwrap();

        sink.write_table(conditions).unwrap();
        sink.write_table(conditions).unwrap();

        // still exactly one file for the table, holding the final state
        let count = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with("dim_conditions")
            })
            .count();
        assert_eq!(count, 1);
    }
}
