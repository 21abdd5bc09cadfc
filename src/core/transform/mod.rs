//! The transform stage
//!
//! Converts flat, inconsistently-typed staging batches into conformed
//! dimension tables, fact tables with derived metrics, and pre-aggregated
//! marts. Dimensions build first, then facts (dimensions feed fact
//! derivation but facts never mutate dimensions), then marts.
//!
//! Everything in this module is pure and synchronous: builders take
//! owned/borrowed tables in and hand new owned tables out. The only
//! ambient input — today's date, for patient age — is a parameter.

pub mod coerce;
pub mod dimensions;
pub mod facts;
pub mod marts;

use crate::domain::batch::RawBatchSet;
use crate::domain::result::Result;
use crate::domain::warehouse::WarehouseTables;
use chrono::NaiveDate;

/// Run every builder in dependency order over one raw batch set.
///
/// Fails only on schema defects (a raw table missing a column a builder
/// cannot work without); value-level defects coerce per the rules in
/// [`coerce`].
pub fn transform_all(raw: &RawBatchSet, today: NaiveDate) -> Result<WarehouseTables> {
    tracing::info!("Running transformations");

    // Dimensions
    let dim_providers = dimensions::build_dim_providers(&raw.providers)?;
    let dim_patients = dimensions::build_dim_patients(&raw.patients, today)?;
    let dim_conditions = dimensions::build_dim_conditions(&raw.conditions)?;
    let dim_date = dimensions::build_dim_date(&raw.encounters)?;

    // Facts
    let fact_encounters = facts::build_fact_encounters(&raw.encounters)?;
    let fact_procedures = facts::build_fact_procedures(&raw.procedures)?;
    let fact_readmissions = facts::build_fact_readmissions(&raw.readmissions)?;

    // Marts
    let mart_provider_productivity =
        marts::build_mart_provider_productivity(&fact_encounters, &dim_providers);
    let mart_appointment_analytics =
        marts::build_mart_appointment_analytics(&fact_encounters, &dim_date);

    let tables = WarehouseTables {
        dim_providers,
        dim_patients,
        dim_conditions,
        dim_date,
        fact_encounters,
        fact_procedures,
        fact_readmissions,
        mart_provider_productivity,
        mart_appointment_analytics,
    };

    for (name, rows) in tables.row_counts() {
        tracing::debug!(table = name, rows, "Built table");
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::{RawBatchSet, RawTable};

    fn table(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> RawTable {
        let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.into_iter().map(|v| v.map(str::to_string)).collect());
        }
        t
    }

    fn sample_batch() -> RawBatchSet {
        RawBatchSet {
            providers: table(
                &["provider_id", "name", "speciality", "organization"],
                vec![
                    vec![Some("p1"), Some("Dr. Chen"), Some("Cardiology"), None],
                    vec![Some("p2"), Some("Dr. Osei"), None, Some("Clinic West")],
                ],
            ),
            patients: table(
                &["patient_id", "first_name", "last_name", "birthdate"],
                vec![vec![Some("pt1"), Some("Ada"), Some("Lovelace"), Some("1990-01-05")]],
            ),
            encounters: table(
                &[
                    "encounter_id",
                    "patient_id",
                    "provider_id",
                    "start_datetime",
                    "end_datetime",
                    "total_cost",
                    "encounter_type",
                    "encounter_class",
                ],
                vec![
                    vec![
                        Some("e1"),
                        Some("pt1"),
                        Some("p1"),
                        Some("2020-03-01T08:00:00"),
                        Some("2020-03-01T10:30:00"),
                        Some("100"),
                        Some("wellness"),
                        Some("ambulatory"),
                    ],
                    vec![
                        Some("e2"),
                        Some("pt1"),
                        Some("p1"),
                        Some("2020-03-01T11:00:00"),
                        Some("2020-03-01T12:00:00"),
                        Some("N/A"),
                        Some("wellness"),
                        Some("ambulatory"),
                    ],
                ],
            ),
            conditions: table(
                &["code", "description"],
                vec![
                    vec![Some("E11"), Some("Type 2 diabetes")],
                    vec![Some("E11"), Some("Type 2 diabetes")],
                ],
            ),
            procedures: table(
                &["procedure_id", "patient_id", "encounter_id", "performed_datetime", "cost"],
                vec![vec![Some("pr1"), Some("pt1"), Some("e1"), Some("2020-03-01T09:00:00"), Some("40")]],
            ),
            organizations: table(&["organization_id", "name"], vec![vec![Some("o1"), Some("Clinic West")]]),
            readmissions: table(
                &["hospital_id", "measure_name", "number_of_discharges"],
                vec![
                    vec![Some("h1"), Some("READM-30-HF"), Some("250")],
                    vec![Some("h2"), Some("READM-30-HF"), Some("180")],
                ],
            ),
        }
    }

    #[test]
    fn test_transform_all_builds_every_table() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tables = transform_all(&sample_batch(), today).unwrap();

        assert_eq!(tables.dim_providers.len(), 2);
        assert_eq!(tables.dim_patients.len(), 1);
        assert_eq!(tables.dim_conditions.len(), 1);
        assert_eq!(tables.dim_date.len(), 1);
        assert_eq!(tables.fact_encounters.len(), 2);
        assert_eq!(tables.fact_procedures.len(), 1);
        assert_eq!(tables.fact_readmissions.len(), 2);
        assert_eq!(tables.mart_provider_productivity.len(), 1);
        assert_eq!(tables.mart_appointment_analytics.len(), 1);

        // provider p1: two encounters, one patient, 100 + 0 (coerced) cost
        let mart = &tables.mart_provider_productivity[0];
        assert_eq!(mart.total_encounters, 2);
        assert_eq!(mart.unique_patients, 1);
        assert_eq!(mart.total_revenue, 100.0);
        assert_eq!(mart.avg_cost_per_encounter, 50.0);
    }

    #[test]
    fn test_transform_all_is_deterministic() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let batch = sample_batch();
        let first = transform_all(&batch, today).unwrap();
        let second = transform_all(&batch, today).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transform_all_schema_defect_aborts() {
        let mut batch = sample_batch();
        batch.encounters = table(&["encounter_id"], vec![]);
        let err = transform_all(
            &batch,
            chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::domain::errors::LodestarError::Schema { .. }
        ));
    }
}
