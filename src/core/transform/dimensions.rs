//! Dimension builders
//!
//! Each builder consumes one raw entity table and emits a cleaned
//! dimension table with a stable surrogate key. Builders are pure
//! functions: the only ambient input (today's date, for patient age) is
//! passed in by the orchestrator so results are reproducible under test.

use crate::core::transform::coerce::{date_key, parse_date, parse_datetime};
use crate::domain::batch::RawTable;
use crate::domain::dimensions::{DimCondition, DimDate, DimPatient, DimProvider};
use crate::domain::result::Result;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Placeholder for demographic and descriptive fields the source left null.
const UNKNOWN: &str = "Unknown";

/// Build `dim_providers`.
///
/// Copies raw provider rows, renames the natural id to the surrogate key
/// column, and defaults null speciality/organization to `"Unknown"`. No
/// deduplication: the source is already one row per provider.
pub fn build_dim_providers(providers: &RawTable) -> Result<Vec<DimProvider>> {
    providers.require_columns("providers", &["provider_id"])?;

    let dim = providers
        .rows()
        .iter()
        .map(|row| {
            let provider_id = row.get_or_empty("provider_id");
            DimProvider {
                provider_key: provider_id.clone(),
                provider_id,
                name: row.get_owned("name"),
                speciality: row.get("speciality").unwrap_or(UNKNOWN).to_string(),
                organization: row.get("organization").unwrap_or(UNKNOWN).to_string(),
            }
        })
        .collect();

    Ok(dim)
}

/// Build `dim_patients`.
///
/// Derives `full_name` from the trimmed first and last names (either one
/// missing renders as the other alone), parses the birthdate permissively,
/// derives integer age against `today`, and defaults null demographic
/// fields to `"Unknown"`.
pub fn build_dim_patients(patients: &RawTable, today: NaiveDate) -> Result<Vec<DimPatient>> {
    patients.require_columns("patients", &["patient_id"])?;

    let dim = patients
        .rows()
        .iter()
        .map(|row| {
            let patient_id = row.get_or_empty("patient_id");
            let first_name = row.get_owned("first_name");
            let last_name = row.get_owned("last_name");
            let birthdate = row.get("birthdate").and_then(parse_date);

            DimPatient {
                patient_key: patient_id.clone(),
                patient_id,
                full_name: full_name(first_name.as_deref(), last_name.as_deref()),
                first_name,
                last_name,
                birthdate,
                age: birthdate.map(|b| age_at(today, b)),
                gender: row.get("gender").unwrap_or(UNKNOWN).to_string(),
                race: row.get("race").unwrap_or(UNKNOWN).to_string(),
                ethnicity: row.get("ethnicity").unwrap_or(UNKNOWN).to_string(),
                marital_status: row.get("marital_status").unwrap_or(UNKNOWN).to_string(),
            }
        })
        .collect();

    Ok(dim)
}

/// Concatenate first and last name with a single blank, trimming each
/// part. A missing part renders as the other part alone.
fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    let first = first.unwrap_or("").trim();
    let last = last.unwrap_or("").trim();
    [first, last]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole years between birthdate and today, truncated toward zero.
fn age_at(today: NaiveDate, birthdate: NaiveDate) -> i32 {
    let days = (today - birthdate).num_days();
    (days as f64 / 365.25) as i32
}

/// Build `dim_conditions`.
///
/// Projects raw condition rows to (code, description), removes exact
/// duplicate pairs keeping the first occurrence, and sets the surrogate
/// key to the code. A code that arrives with two distinct descriptions
/// keeps both rows; which duplicates collapse is an accepted ambiguity of
/// the source feed.
pub fn build_dim_conditions(conditions: &RawTable) -> Result<Vec<DimCondition>> {
    conditions.require_columns("conditions", &["code"])?;

    let mut seen: BTreeSet<(String, Option<String>)> = BTreeSet::new();
    let mut dim = Vec::new();

    for row in conditions.rows() {
        let code = row.get_or_empty("code");
        let description = row.get_owned("description");
        if seen.insert((code.clone(), description.clone())) {
            dim.push(DimCondition {
                condition_key: code.clone(),
                code,
                description,
            });
        }
    }

    Ok(dim)
}

/// Build `dim_date` from encounter start timestamps.
///
/// One row per distinct calendar date among parsable `start_datetime`
/// values (time-of-day ignored), sorted ascending. Encounters whose start
/// timestamp does not parse contribute no date row. Only encounter starts
/// feed this dimension — procedure and readmission dates do not.
pub fn build_dim_date(encounters: &RawTable) -> Result<Vec<DimDate>> {
    encounters.require_columns("encounters", &["start_datetime"])?;

    let dates: BTreeSet<NaiveDate> = encounters
        .rows()
        .iter()
        .filter_map(|row| row.get("start_datetime"))
        .filter_map(parse_datetime)
        .map(|dt| dt.date())
        .collect();

    Ok(dates.into_iter().map(date_row).collect())
}

/// Populate the calendar attributes for one date.
fn date_row(date: NaiveDate) -> DimDate {
    // Monday=0 convention; weekend is Saturday (5) or Sunday (6).
    let day_of_week = date.weekday().num_days_from_monday();
    DimDate {
        date_key: date_key(date),
        full_date: date,
        year: date.year(),
        quarter: date.month0() / 3 + 1,
        month: date.month(),
        month_name: date.format("%B").to_string(),
        week: date.iso_week().week(),
        day_of_week,
        day_name: date.format("%A").to_string(),
        is_weekend: day_of_week >= 5,
    }
}
