//! Raw staging batches
//!
//! The staging source hands the pipeline one untyped table per entity name.
//! A [`RawTable`] carries its column list plus rows of string-rendered
//! cells: staging columns are inconsistently typed, so every scalar travels
//! as its text rendering and SQL nulls travel as `None`. Typing happens in
//! the builders, not here.
//!
//! Reading a cell for a column the table does not carry yields null — a
//! missing optional column behaves exactly like an entirely-null column.
//! Builders declare the columns they cannot work without via
//! [`RawTable::require_columns`], which turns an absent column into a fatal
//! schema defect for that builder.

use crate::domain::errors::{LodestarError, SourceError};
use crate::domain::result::Result;
use std::collections::HashMap;

/// One untyped tabular batch from the staging source.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

/// A single untyped row: column name to optional string-rendered value.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, Option<String>>,
}

impl RawRow {
    /// Create a row from (column, value) pairs.
    pub fn new(cells: impl IntoIterator<Item = (String, Option<String>)>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Read a cell. Returns `None` both for a SQL null and for a column
    /// this row does not carry.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// Read a cell as an owned `String`, coercing null to the empty string.
    ///
    /// Used for identity columns that the typed model carries as plain
    /// `String`: a null id passes through as `""` rather than rejecting
    /// the row.
    pub fn get_or_empty(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Read a cell as an owned optional `String`.
    pub fn get_owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

impl RawTable {
    /// Create an empty table with the given column list.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row given values aligned with this table's column list.
    pub fn push_row(&mut self, values: Vec<Option<String>>) {
        let cells = self
            .columns
            .iter()
            .cloned()
            .zip(values.into_iter().chain(std::iter::repeat(None)))
            .collect::<Vec<_>>();
        self.rows.push(RawRow::new(cells));
    }

    /// Build a table from JSON object rows (one `serde_json::Value::Object`
    /// per staging row, as produced by `SELECT to_jsonb(t)`).
    ///
    /// Scalars are carried as their string rendering; nested values keep
    /// their JSON rendering. The column list is the union of keys seen.
    pub fn from_json_rows(values: Vec<serde_json::Value>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(values.len());

        for value in values {
            let serde_json::Value::Object(map) = value else {
                continue;
            };
            let mut cells = Vec::with_capacity(map.len());
            for (key, cell) in map {
                if !columns.iter().any(|c| c == &key) {
                    columns.push(key.clone());
                }
                let rendered = match cell {
                    serde_json::Value::Null => None,
                    serde_json::Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                };
                cells.push((key, rendered));
            }
            rows.push(RawRow::new(cells));
        }

        Self { columns, rows }
    }

    /// The column names this table carries.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the table carries the named column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Fail with a schema defect if any of `required` is absent.
    pub fn require_columns(&self, table_name: &str, required: &[&str]) -> Result<()> {
        for column in required {
            if !self.has_column(column) {
                return Err(LodestarError::Schema {
                    table: table_name.to_string(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(())
    }

    /// The rows of this table.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The fixed entity names the staging source must supply.
pub const ENTITY_NAMES: [&str; 7] = [
    "providers",
    "patients",
    "encounters",
    "conditions",
    "procedures",
    "organizations",
    "readmissions",
];

/// The complete set of raw entity tables for one pipeline run.
///
/// Exclusively owned by the orchestrator and consumed by the transform
/// phase. `organizations` is part of the input contract and is counted in
/// the extract report, but no builder in this core consumes it.
#[derive(Debug, Clone, Default)]
pub struct RawBatchSet {
    pub providers: RawTable,
    pub patients: RawTable,
    pub encounters: RawTable,
    pub conditions: RawTable,
    pub procedures: RawTable,
    pub organizations: RawTable,
    pub readmissions: RawTable,
}

impl RawBatchSet {
    /// Assemble the batch set from a name-to-table mapping.
    ///
    /// Every entity in [`ENTITY_NAMES`] must be present; a missing entity
    /// is a fatal source error raised before any transform work begins.
    pub fn from_tables(mut tables: HashMap<String, RawTable>) -> Result<Self> {
        let mut take = |name: &str| -> Result<RawTable> {
            tables
                .remove(name)
                .ok_or_else(|| SourceError::MissingEntity(name.to_string()).into())
        };

        Ok(Self {
            providers: take("providers")?,
            patients: take("patients")?,
            encounters: take("encounters")?,
            conditions: take("conditions")?,
            procedures: take("procedures")?,
            organizations: take("organizations")?,
            readmissions: take("readmissions")?,
        })
    }

    /// (entity name, row count) pairs for the extract report.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("providers", self.providers.len()),
            ("patients", self.patients.len()),
            ("encounters", self.encounters.len()),
            ("conditions", self.conditions.len()),
            ("procedures", self.procedures.len()),
            ("organizations", self.organizations.len()),
            ("readmissions", self.readmissions.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(columns: &[&str], rows: Vec<Vec<Option<&str>>>) -> RawTable {
        let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.into_iter().map(|v| v.map(str::to_string)).collect());
        }
        t
    }

    #[test]
    fn test_missing_column_reads_as_null() {
        let t = table(&["a"], vec![vec![Some("1")]]);
        assert_eq!(t.rows()[0].get("a"), Some("1"));
        assert_eq!(t.rows()[0].get("b"), None);
    }

    #[test]
    fn test_require_columns_reports_schema_defect() {
        let t = table(&["a"], vec![]);
        let err = t.require_columns("providers", &["a", "provider_id"]).unwrap_err();
        assert!(matches!(
            err,
            LodestarError::Schema { ref table, ref column }
                if table == "providers" && column == "provider_id"
        ));
    }

    #[test]
    fn test_from_json_rows_renders_scalars() {
        let t = RawTable::from_json_rows(vec![
            json!({"id": "p1", "count": 3, "rate": 1.5, "flag": true, "gone": null}),
        ]);
        let row = &t.rows()[0];
        assert_eq!(row.get("id"), Some("p1"));
        assert_eq!(row.get("count"), Some("3"));
        assert_eq!(row.get("rate"), Some("1.5"));
        assert_eq!(row.get("flag"), Some("true"));
        assert_eq!(row.get("gone"), None);
        assert!(t.has_column("gone"));
    }

    #[test]
    fn test_batch_set_rejects_missing_entity() {
        let mut tables = HashMap::new();
        for name in ["providers", "patients", "encounters"] {
            tables.insert(name.to_string(), RawTable::default());
        }
        let err = RawBatchSet::from_tables(tables).unwrap_err();
        assert!(err.to_string().contains("conditions"));
    }

    #[test]
    fn test_batch_set_accepts_full_mapping() {
        let mut tables = HashMap::new();
        for name in ENTITY_NAMES {
            tables.insert(name.to_string(), RawTable::default());
        }
        let set = RawBatchSet::from_tables(tables).unwrap();
        assert_eq!(set.row_counts().len(), 7);
    }

    #[test]
    fn test_get_or_empty_coerces_null_id() {
        let t = table(&["provider_id"], vec![vec![None]]);
        assert_eq!(t.rows()[0].get_or_empty("provider_id"), "");
    }
}
