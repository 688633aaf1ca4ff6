//! The data source adapter.
//!
//! [`DataSource::execute`] is the only way the dashboard reads from
//! Postgres. Connection and query failures are logged and degrade to an
//! empty [`Table`], which callers render as "no data".

use moosicbox_json_utils::database::ToValue as _;
use securecheck_database_models::{Table, Value};
use serde_json::Map;

use crate::{DbError, db};

type Record = Map<String, serde_json::Value>;

/// Executes SQL against the configured Postgres database.
///
/// Holds only the connection URL; every call acquires its own connection
/// and releases it before returning, on success and on failure.
#[derive(Debug, Clone)]
pub struct DataSource {
    url: String,
}

impl DataSource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Creates a data source from the `DATABASE_URL` environment variable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(db::database_url_from_env())
    }

    /// Runs `sql` and returns its result, or an empty table if anything
    /// goes wrong.
    pub async fn execute(&self, sql: &str) -> Table {
        match self.try_execute(sql).await {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to execute query: {e}");
                Table::new()
            }
        }
    }

    /// Runs `sql` and returns its result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection cannot be opened, the
    /// statement fails, or a result record cannot be decoded.
    pub async fn try_execute(&self, sql: &str) -> Result<Table, DbError> {
        let conn = db::connect(&self.url).await?;
        let rows = conn.query_raw_params(&wrap_as_json(sql), &[]).await?;
        drop(conn);

        let records = rows
            .iter()
            .map(|row| {
                let record: Result<String, _> = row.to_value("record");
                record.map_err(|e| DbError::Decode {
                    message: format!("Failed to read record column: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = decode_records(&records)?;
        log::debug!(
            "Query returned {} rows across {} columns",
            table.len(),
            table.columns().len()
        );
        Ok(table)
    }
}

/// Wraps a statement so each result row comes back as one JSON object.
///
/// Postgres accepts CTEs inside a derived table, so any single `SELECT`
/// or `WITH` statement can be wrapped. A trailing `;` is removed first.
///
/// The outer query is a plain projection with no join, aggregate, or
/// ordering of its own, so rows keep the order of the inner statement's
/// `ORDER BY`.
fn wrap_as_json(sql: &str) -> String {
    let inner = sql.trim().trim_end_matches(';').trim_end();
    format!("SELECT row_to_json(q)::text AS record FROM (\n{inner}\n) q")
}

/// Decodes JSON records into a table.
///
/// Column order follows first appearance across the records; a key that
/// is missing from a record becomes [`Value::Null`].
fn decode_records(records: &[String]) -> Result<Table, DbError> {
    let mut names: Vec<String> = Vec::new();
    let mut parsed: Vec<Record> = Vec::with_capacity(records.len());

    for raw in records {
        let record: Record = serde_json::from_str(raw).map_err(|e| DbError::Decode {
            message: format!("Invalid JSON record: {e}"),
        })?;
        for key in record.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
        parsed.push(record);
    }

    let rows = parsed
        .into_iter()
        .map(|mut record| {
            names
                .iter()
                .map(|name| record.remove(name).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    Ok(Table::from_rows(names, rows))
}

fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s),
        other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
            Value::Text(other.to_string())
        }
    }
}
