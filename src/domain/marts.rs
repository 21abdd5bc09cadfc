//! Pre-aggregated mart rows
//!
//! Analysis-ready summaries derived from `fact_encounters` and the
//! dimensions. Every averaged or summed monetary/duration figure is
//! rounded to two decimals at build time; consumers read these tables
//! as-is.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of `mart_provider_productivity`.
///
/// Grouped by provider key over `fact_encounters`; providers with zero
/// encounters are absent. The provider descriptive columns come from a
/// left join against `dim_providers`, so they are null when a fact row
/// references a provider key the dimension does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProductivity {
    pub provider_key: String,
    pub total_encounters: u64,
    pub unique_patients: u64,
    pub avg_encounter_duration_hrs: Option<f64>,
    pub total_revenue: f64,
    pub avg_cost_per_encounter: f64,
    pub first_encounter: Option<NaiveDateTime>,
    pub last_encounter: Option<NaiveDateTime>,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub speciality: Option<String>,
    pub organization: Option<String>,
}

/// One row of `mart_appointment_analytics`.
///
/// Grouped by (year, quarter, month, month_name, encounter_type,
/// encounter_class) over `fact_encounters` joined to `dim_date`. Only
/// observed combinations appear — no zero-filled calendar gaps, and rows
/// with an incomplete group key (unparsable start date, null type or
/// class) do not contribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentAnalytics {
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: String,
    pub encounter_type: String,
    pub encounter_class: String,
    pub encounter_count: u64,
    pub unique_patients: u64,
    pub unique_providers: u64,
    pub avg_duration_hrs: Option<f64>,
    pub total_cost: f64,
    pub avg_cost: f64,
}
