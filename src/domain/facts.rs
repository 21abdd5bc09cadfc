//! Fact table rows
//!
//! Measured events with foreign keys into the dimensions. Fact keys are
//! set directly from source ids; no referential check against the
//! dimensions is enforced here (the staging data is assumed aligned, and
//! the permissive join is preserved deliberately — see DESIGN.md).
//!
//! The null-handling policy is uniform: an unparsable timestamp leaves the
//! timestamp (and anything derived from it) null while the row is kept; an
//! unparsable numeric coerces to zero. Rows are never rejected for bad
//! values, only for structurally missing columns.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row of `fact_encounters`.
///
/// `duration_hours` is the wall-clock difference in hours rounded to two
/// decimals; negative durations pass through unclamped, signaling upstream
/// data defects. `date_key` is null when the start timestamp is
/// unparsable; such rows drop out of date-joined marts but stay here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactEncounter {
    pub encounter_id: String,
    pub patient_key: String,
    pub provider_key: String,
    pub date_key: Option<i32>,
    pub encounter_type: Option<String>,
    pub encounter_class: Option<String>,
    pub start_datetime: Option<NaiveDateTime>,
    pub end_datetime: Option<NaiveDateTime>,
    pub duration_hours: Option<f64>,
    pub total_cost: f64,
    pub reason_code: Option<String>,
    pub reason_description: Option<String>,
}

/// One row of `fact_procedures`.
///
/// `procedure_id` is synthesized positionally when the source column is
/// absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactProcedure {
    pub procedure_id: String,
    pub patient_key: String,
    pub encounter_id: Option<String>,
    pub date_key: Option<i32>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub performed_datetime: Option<NaiveDateTime>,
    pub cost: f64,
}

/// One row of `fact_readmissions`.
///
/// `readmission_id` is a 1-based sequential integer over the incoming row
/// order. It is positional, not source-stable: re-extracting in a
/// different order changes it. All rate/count columns coerce to numeric
/// with zero as the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactReadmission {
    pub readmission_id: i64,
    pub hospital_id: String,
    pub hospital_name: Option<String>,
    pub measure_name: String,
    pub number_of_discharges: f64,
    pub expected_readmission_rate: f64,
    pub predicted_readmission_rate: f64,
    pub excess_readmission_ratio: f64,
    pub number_of_readmissions: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
