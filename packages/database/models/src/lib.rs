#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory tabular result types.
//!
//! Every query result, including the full `traffic_stops` load, crosses
//! the data source boundary as a [`Table`]: a set of named, equally long
//! [`Column`]s of dynamically typed [`Value`]s. The normalizer turns the
//! raw text/number cells into their cleaned types in place.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A single cell.
///
/// Serializes untagged so that a table renders as plain JSON scalars
/// (`null`, strings, numbers, booleans, ISO-8601 dates and times).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text content if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns `true` if no cell in this column holds a value.
    ///
    /// Vacuously `true` for a column with no rows.
    #[must_use]
    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(Value::is_null)
    }

    /// Iterates over the non-null cells in row order.
    pub fn present(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

/// An ordered collection of equally long columns.
///
/// The row count is tracked separately so that a table keeps its length
/// even after every column has been dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Creates an empty table with neither rows nor columns.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
        }
    }

    /// Builds a table from row-major data.
    ///
    /// Rows shorter than `names` are padded with [`Value::Null`]; extra
    /// cells are ignored.
    #[must_use]
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let row_count = rows.len();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(row_count)))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().unwrap_or(Value::Null));
            }
        }

        Self {
            columns,
            rows: row_count,
        }
    }

    /// Appends a column, builder style. See [`Table::push_column`].
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.push_column(Column::new(name, values));
        self
    }

    /// Appends a column, replacing any existing column of the same name.
    ///
    /// The first column pushed into a table without columns sets the row
    /// count; later columns are padded with [`Value::Null`] or truncated
    /// to match it.
    pub fn push_column(&mut self, mut column: Column) {
        if self.columns.is_empty() && self.rows == 0 {
            self.rows = column.values.len();
        }
        column.values.resize(self.rows, Value::Null);

        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the cell at `row` in the named column.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Keeps only the columns for which `keep` returns `true`.
    pub fn retain_columns(&mut self, keep: impl FnMut(&Column) -> bool) {
        self.columns.retain(keep);
    }

    /// Iterates over the table row by row, cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.rows).map(|i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_pads_short_rows() {
        let table = Table::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::from(1i64)], vec![Value::from(2i64), Value::from("x")]],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "b"), Some(&Value::Null));
        assert_eq!(table.value(1, "b"), Some(&Value::from("x")));
        assert_eq!(table.value(0, "missing"), None);
    }

    #[test]
    fn push_column_matches_row_count() {
        let table = Table::new()
            .with_column("a", vec![Value::from(1i64), Value::from(2i64), Value::from(3i64)])
            .with_column("b", vec![Value::from(true)])
            .with_column("c", vec![Value::Null; 5]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.column("b").unwrap().values.len(), 3);
        assert_eq!(table.column("c").unwrap().values.len(), 3);
        assert_eq!(table.column_names(), ["a", "b", "c"]);
    }

    #[test]
    fn row_count_survives_dropping_columns() {
        let mut table = Table::new().with_column("a", vec![Value::Null, Value::Null]);
        table.retain_columns(|c| !c.is_all_null());

        assert!(table.columns().is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn values_serialize_as_plain_json_scalars() {
        let row = vec![
            Value::Null,
            Value::from("F"),
            Value::from(30i64),
            Value::from(true),
            Value::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,"F",30,true,"2020-01-02"]"#);
    }
}
