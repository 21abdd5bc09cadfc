//! Dimension table rows
//!
//! Conformed descriptive entities referenced by key from the fact tables.
//! Every row type derives `Serialize`/`Deserialize`: the serde shape is
//! also the arrow schema used by both sinks, so a field added here flows
//! through to the warehouse and the Parquet fallback without further work.
//!
//! Timestamps are `chrono` naive types throughout — timezone-free by
//! construction, which is what both destinations require.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of `dim_providers`.
///
/// The surrogate key is the source provider id; `speciality` and
/// `organization` are never null (defaulted to `"Unknown"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimProvider {
    pub provider_key: String,
    pub provider_id: String,
    pub name: Option<String>,
    pub speciality: String,
    pub organization: String,
}

/// One row of `dim_patients`.
///
/// `full_name` and `age` are derived; `age` is null only when the source
/// birthdate is unparsable. Demographic text fields are never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimPatient {
    pub patient_key: String,
    pub patient_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub birthdate: Option<NaiveDate>,
    pub age: Option<i32>,
    pub gender: String,
    pub race: String,
    pub ethnicity: String,
    pub marital_status: String,
}

/// One row of `dim_conditions`: one per distinct (code, description) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimCondition {
    pub condition_key: String,
    pub code: String,
    pub description: Option<String>,
}

/// One row of `dim_date`.
///
/// Generated from distinct encounter start dates, never manually edited.
/// `day_of_week` uses the Monday=0 convention; `is_weekend` is true iff
/// the index is 5 or 6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimDate {
    pub date_key: i32,
    pub full_date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: String,
    pub week: u32,
    pub day_of_week: u32,
    pub day_name: String,
    pub is_weekend: bool,
}
