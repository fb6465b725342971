//! Tabular result produced from a JSON success body

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered field names plus value rows, one value per field.
///
/// Every row has exactly `fields().len()` values, in field order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TabularResult {
    fields: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TabularResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result, padding short rows with nulls and truncating long ones
    /// so the row width always matches the field list.
    pub fn new(fields: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = fields.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { fields, rows }
    }

    /// Field names in first-seen order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a field in the field list
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Value of `field` in row `row`
    pub fn value(&self, row: usize, field: &str) -> Option<&Value> {
        let idx = self.field_index(field)?;
        self.rows.get(row)?.get(idx)
    }

    /// Value of `field` in the first row
    pub fn first_value(&self, field: &str) -> Option<&Value> {
        self.value(0, field)
    }

    /// A row as an ordered field → value map
    pub fn row_as_map(&self, row: usize) -> Option<Map<String, Value>> {
        let values = self.rows.get(row)?;
        Some(
            self.fields
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect(),
        )
    }

    /// All rows as ordered maps
    pub fn rows_as_maps(&self) -> Vec<Map<String, Value>> {
        (0..self.rows.len())
            .filter_map(|i| self.row_as_map(i))
            .collect()
    }
}
