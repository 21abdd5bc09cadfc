//! The owned warehouse table set
//!
//! [`WarehouseTables`] is the context object the transform phase produces
//! and the load phase consumes: nine fully-materialized typed tables,
//! passed by value from phase to phase with no ambient shared store.
//!
//! Both sinks speak arrow, so this module also renders each typed table to
//! a `RecordBatch`. The arrow schema is traced from the serde shape of the
//! row type (`serde_arrow`), which keeps the typed model the single source
//! of truth for column names and nullability.

use crate::domain::dimensions::{DimCondition, DimDate, DimPatient, DimProvider};
use crate::domain::errors::LodestarError;
use crate::domain::facts::{FactEncounter, FactProcedure, FactReadmission};
use crate::domain::marts::{AppointmentAnalytics, ProviderProductivity};
use crate::domain::result::Result;
use arrow::array::RecordBatch;
use arrow::datatypes::FieldRef;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

/// Output table names, in load order.
pub const TABLE_NAMES: [&str; 9] = [
    "dim_providers",
    "dim_patients",
    "dim_conditions",
    "dim_date",
    "fact_encounters",
    "fact_procedures",
    "fact_readmissions",
    "mart_provider_productivity",
    "mart_appointment_analytics",
];

/// The complete named table set for one pipeline run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseTables {
    pub dim_providers: Vec<DimProvider>,
    pub dim_patients: Vec<DimPatient>,
    pub dim_conditions: Vec<DimCondition>,
    pub dim_date: Vec<DimDate>,
    pub fact_encounters: Vec<FactEncounter>,
    pub fact_procedures: Vec<FactProcedure>,
    pub fact_readmissions: Vec<FactReadmission>,
    pub mart_provider_productivity: Vec<ProviderProductivity>,
    pub mart_appointment_analytics: Vec<AppointmentAnalytics>,
}

/// One table rendered for the sinks: its output name plus arrow rows.
#[derive(Debug, Clone)]
pub struct NamedBatch {
    pub name: &'static str,
    pub batch: RecordBatch,
}

impl NamedBatch {
    /// Number of rows in this table.
    pub fn rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns in this table.
    pub fn columns(&self) -> usize {
        self.batch.num_columns()
    }
}

impl WarehouseTables {
    /// (table name, row count) pairs, in load order.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("dim_providers", self.dim_providers.len()),
            ("dim_patients", self.dim_patients.len()),
            ("dim_conditions", self.dim_conditions.len()),
            ("dim_date", self.dim_date.len()),
            ("fact_encounters", self.fact_encounters.len()),
            ("fact_procedures", self.fact_procedures.len()),
            ("fact_readmissions", self.fact_readmissions.len()),
            (
                "mart_provider_productivity",
                self.mart_provider_productivity.len(),
            ),
            (
                "mart_appointment_analytics",
                self.mart_appointment_analytics.len(),
            ),
        ]
    }

    /// Render every table to an arrow `RecordBatch`, in load order.
    ///
    /// Works for empty tables too: the schema is traced from the row type,
    /// not from samples.
    pub fn to_record_batches(&self) -> Result<Vec<NamedBatch>> {
        Ok(vec![
            to_named_batch("dim_providers", &self.dim_providers)?,
            to_named_batch("dim_patients", &self.dim_patients)?,
            to_named_batch("dim_conditions", &self.dim_conditions)?,
            to_named_batch("dim_date", &self.dim_date)?,
            to_named_batch("fact_encounters", &self.fact_encounters)?,
            to_named_batch("fact_procedures", &self.fact_procedures)?,
            to_named_batch("fact_readmissions", &self.fact_readmissions)?,
            to_named_batch(
                "mart_provider_productivity",
                &self.mart_provider_productivity,
            )?,
            to_named_batch(
                "mart_appointment_analytics",
                &self.mart_appointment_analytics,
            )?,
        ])
    }
}

/// Render one typed table to a named `RecordBatch`.
fn to_named_batch<T>(name: &'static str, rows: &[T]) -> Result<NamedBatch>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let fields = Vec::<FieldRef>::from_type::<T>(TracingOptions::default().allow_null_fields(true))
        .map_err(|e| LodestarError::Serialization(format!("schema for '{name}': {e}")))?;
    let batch = serde_arrow::to_record_batch(&fields, &rows)
        .map_err(|e| LodestarError::Serialization(format!("encoding '{name}': {e}")))?;
    Ok(NamedBatch { name, batch })
}
