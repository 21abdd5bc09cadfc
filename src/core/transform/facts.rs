//! Fact builders
//!
//! Fact tables carry the measured events with derived numeric and
//! temporal columns. Keys are taken directly from source ids — the
//! staging feed is assumed aligned with the dimension keys, and no
//! referential check is enforced here.

use crate::core::transform::coerce::{
    coerce_numeric, date_key, parse_date, parse_datetime, round2,
};
use crate::domain::batch::RawTable;
use crate::domain::facts::{FactEncounter, FactProcedure, FactReadmission};
use crate::domain::result::Result;
use chrono::NaiveDateTime;

/// Build `fact_encounters`.
///
/// Timestamps parse permissively; `duration_hours` is the wall-clock
/// difference in hours rounded to two decimals, null when either end is
/// unparsable, and negative when the source is (durations are not
/// clamped). `date_key` comes from the start date; `total_cost` coerces
/// to numeric with zero as the default.
pub fn build_fact_encounters(encounters: &RawTable) -> Result<Vec<FactEncounter>> {
    encounters.require_columns(
        "encounters",
        &[
            "encounter_id",
            "patient_id",
            "provider_id",
            "start_datetime",
            "end_datetime",
        ],
    )?;

    let fact = encounters
        .rows()
        .iter()
        .map(|row| {
            let start = row.get("start_datetime").and_then(parse_datetime);
            let end = row.get("end_datetime").and_then(parse_datetime);

            FactEncounter {
                encounter_id: row.get_or_empty("encounter_id"),
                patient_key: row.get_or_empty("patient_id"),
                provider_key: row.get_or_empty("provider_id"),
                date_key: start.map(|dt| date_key(dt.date())),
                encounter_type: row.get_owned("encounter_type"),
                encounter_class: row.get_owned("encounter_class"),
                start_datetime: start,
                end_datetime: end,
                duration_hours: duration_hours(start, end),
                total_cost: coerce_numeric(row.get("total_cost")),
                reason_code: row.get_owned("reason_code"),
                reason_description: row.get_owned("reason_description"),
            }
        })
        .collect();

    Ok(fact)
}

/// Wall-clock difference in hours, rounded to two decimals.
fn duration_hours(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<f64> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let seconds = (end - start).num_seconds() as f64;
            Some(round2(seconds / 3600.0))
        }
        _ => None,
    }
}

/// Build `fact_procedures`.
///
/// Same timestamp and cost coercion discipline as encounters, applied to
/// `performed_datetime`/`cost`. `procedure_id` is synthesized as
/// `PROC-{n}` (1-based row position) when the source column is absent or
/// the value is null.
pub fn build_fact_procedures(procedures: &RawTable) -> Result<Vec<FactProcedure>> {
    procedures.require_columns("procedures", &["patient_id", "performed_datetime"])?;

    let fact = procedures
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let performed = row.get("performed_datetime").and_then(parse_datetime);

            FactProcedure {
                procedure_id: row
                    .get_owned("procedure_id")
                    .unwrap_or_else(|| format!("PROC-{}", index + 1)),
                patient_key: row.get_or_empty("patient_id"),
                encounter_id: row.get_owned("encounter_id"),
                date_key: performed.map(|dt| date_key(dt.date())),
                code: row.get_owned("code"),
                description: row.get_owned("description"),
                performed_datetime: performed,
                cost: coerce_numeric(row.get("cost")),
            }
        })
        .collect();

    Ok(fact)
}

/// Build `fact_readmissions`.
///
/// No timestamp derivation. `readmission_id` is assigned 1-based over the
/// incoming row order — positional, not source-stable, so it only
/// round-trips when the extraction order does. Rate and count columns
/// coerce to numeric with zero defaults; period bounds parse permissively.
pub fn build_fact_readmissions(readmissions: &RawTable) -> Result<Vec<FactReadmission>> {
    readmissions.require_columns("readmissions", &["hospital_id", "measure_name"])?;

    let fact = readmissions
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| FactReadmission {
            readmission_id: index as i64 + 1,
            hospital_id: row.get_or_empty("hospital_id"),
            hospital_name: row.get_owned("hospital_name"),
            measure_name: row.get_or_empty("measure_name"),
            number_of_discharges: coerce_numeric(row.get("number_of_discharges")),
            expected_readmission_rate: coerce_numeric(row.get("expected_readmission_rate")),
            predicted_readmission_rate: coerce_numeric(row.get("predicted_readmission_rate")),
            excess_readmission_ratio: coerce_numeric(row.get("excess_readmission_ratio")),
            number_of_readmissions: coerce_numeric(row.get("number_of_readmissions")),
            start_date: row.get("start_date").and_then(parse_date),
            end_date: row.get("end_date").and_then(parse_date),
        })
        .collect();

    Ok(fact)
}
