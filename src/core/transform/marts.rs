//! Mart builders
//!
//! Pre-aggregated summaries over `fact_encounters`. Grouping uses ordered
//! maps so mart output is deterministic: two runs over identical input
//! produce identical tables, row for row.

use crate::core::transform::coerce::round2;
use crate::domain::dimensions::{DimDate, DimProvider};
use crate::domain::facts::FactEncounter;
use crate::domain::marts::{AppointmentAnalytics, ProviderProductivity};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Running aggregate for one group of encounters.
#[derive(Debug, Default)]
struct EncounterAggregate {
    count: u64,
    patients: HashSet<String>,
    providers: HashSet<String>,
    duration_sum: f64,
    duration_count: u64,
    cost_sum: f64,
    first_start: Option<NaiveDateTime>,
    last_start: Option<NaiveDateTime>,
}

impl EncounterAggregate {
    fn add(&mut self, encounter: &FactEncounter) {
        self.count += 1;
        self.patients.insert(encounter.patient_key.clone());
        self.providers.insert(encounter.provider_key.clone());
        if let Some(duration) = encounter.duration_hours {
            self.duration_sum += duration;
            self.duration_count += 1;
        }
        self.cost_sum += encounter.total_cost;
        if let Some(start) = encounter.start_datetime {
            self.first_start = Some(self.first_start.map_or(start, |f| f.min(start)));
            self.last_start = Some(self.last_start.map_or(start, |l| l.max(start)));
        }
    }

    /// Mean duration over the encounters whose duration is non-null.
    fn avg_duration(&self) -> Option<f64> {
        (self.duration_count > 0).then(|| round2(self.duration_sum / self.duration_count as f64))
    }

    fn avg_cost(&self) -> f64 {
        round2(self.cost_sum / self.count as f64)
    }
}

/// Build `mart_provider_productivity`.
///
/// Groups `fact_encounters` by provider key and left-joins the provider
/// descriptive columns. The aggregation is encounter-driven: providers
/// with zero encounters do not appear.
pub fn build_mart_provider_productivity(
    fact_encounters: &[FactEncounter],
    dim_providers: &[DimProvider],
) -> Vec<ProviderProductivity> {
    let mut groups: BTreeMap<String, EncounterAggregate> = BTreeMap::new();
    for encounter in fact_encounters {
        groups
            .entry(encounter.provider_key.clone())
            .or_default()
            .add(encounter);
    }

    let providers: HashMap<&str, &DimProvider> = dim_providers
        .iter()
        .map(|p| (p.provider_key.as_str(), p))
        .collect();

    groups
        .into_iter()
        .map(|(provider_key, agg)| {
            let provider = providers.get(provider_key.as_str());
            ProviderProductivity {
                total_encounters: agg.count,
                unique_patients: agg.patients.len() as u64,
                avg_encounter_duration_hrs: agg.avg_duration(),
                total_revenue: round2(agg.cost_sum),
                avg_cost_per_encounter: agg.avg_cost(),
                first_encounter: agg.first_start,
                last_encounter: agg.last_start,
                provider_id: provider.map(|p| p.provider_id.clone()),
                provider_name: provider.and_then(|p| p.name.clone()),
                speciality: provider.map(|p| p.speciality.clone()),
                organization: provider.map(|p| p.organization.clone()),
                provider_key,
            }
        })
        .collect()
}

/// Group key for `mart_appointment_analytics`, ordered by its fields.
type PeriodTypeKey = (i32, u32, u32, String, String);

/// Build `mart_appointment_analytics`.
///
/// Joins `fact_encounters` to `dim_date` on `date_key` and groups by
/// (year, quarter, month, month_name, encounter_type, encounter_class).
/// A row with an incomplete group key — null date key or null type/class —
/// contributes nothing; only observed combinations appear.
pub fn build_mart_appointment_analytics(
    fact_encounters: &[FactEncounter],
    dim_date: &[DimDate],
) -> Vec<AppointmentAnalytics> {
    let dates: HashMap<i32, &DimDate> = dim_date.iter().map(|d| (d.date_key, d)).collect();

    let mut groups: BTreeMap<PeriodTypeKey, EncounterAggregate> = BTreeMap::new();
    for encounter in fact_encounters {
        let Some(date) = encounter.date_key.and_then(|key| dates.get(&key)) else {
            continue;
        };
        let (Some(encounter_type), Some(encounter_class)) =
            (&encounter.encounter_type, &encounter.encounter_class)
        else {
            continue;
        };

        let key = (
            date.year,
            date.quarter,
            date.month,
            encounter_type.clone(),
            encounter_class.clone(),
        );
        groups.entry(key).or_default().add(encounter);
    }

    groups
        .into_iter()
        .map(|((year, quarter, month, encounter_type, encounter_class), agg)| {
            AppointmentAnalytics {
                year,
                quarter,
                month,
                month_name: month_name(month),
                encounter_type,
                encounter_class,
                encounter_count: agg.count,
                unique_patients: agg.patients.len() as u64,
                unique_providers: agg.providers.len() as u64,
                avg_duration_hrs: agg.avg_duration(),
                total_cost: round2(agg.cost_sum),
                avg_cost: agg.avg_cost(),
            }
        })
        .collect()
}

fn month_name(month: u32) -> String {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
    .to_string()
}
