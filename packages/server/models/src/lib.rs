#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the SecureCheck server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the analytics and table types to allow independent evolution of
//! the API contract.

use securecheck_analytics_models::{KeyMetrics, MetricPoint, Prediction};
use securecheck_catalog::QueryRegistry;
use securecheck_database_models::{Table, Value};
use securecheck_stop_models::{
    StopLog, StopLogError, parse_age, parse_answer, parse_duration, parse_gender, parse_stop_date,
    parse_stop_time,
};
use serde::{Deserialize, Serialize};

/// Warning attached to a canned query run that returned no rows.
pub const NO_DATA_WARNING: &str = "No data found for the selected query.";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// A table rendered row-major for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTable {
    /// Column names in table order.
    pub columns: Vec<String>,
    /// One entry per row, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl From<&Table> for ApiTable {
    fn from(table: &Table) -> Self {
        Self {
            columns: table
                .column_names()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            rows: table
                .rows()
                .map(|row| row.into_iter().cloned().collect())
                .collect(),
        }
    }
}

/// Key metrics plus the bar chart points derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    pub metrics: KeyMetrics,
    pub points: Vec<MetricPoint>,
}

impl From<KeyMetrics> for ApiMetrics {
    fn from(metrics: KeyMetrics) -> Self {
        Self {
            points: metrics.points(),
            metrics,
        }
    }
}

/// Labels offered by one query registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQueryList {
    pub registry: QueryRegistry,
    pub labels: Vec<String>,
}

/// Query parameters for the SQL preview endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryLabelParams {
    pub label: String,
}

/// The SQL text behind a label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuerySql {
    pub registry: QueryRegistry,
    pub label: String,
    pub sql: String,
}

/// Body of a canned query run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunQueryRequest {
    pub label: String,
}

/// Result of running a canned query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQueryResult {
    pub label: String,
    pub sql: String,
    pub table: ApiTable,
    /// Set when the query returned no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ApiQueryResult {
    #[must_use]
    pub fn new(label: String, sql: String, table: &Table) -> Self {
        let warning = table.is_empty().then(|| NO_DATA_WARNING.to_string());
        Self {
            label,
            sql,
            table: ApiTable::from(table),
            warning,
        }
    }
}

/// A police log as posted by the entry form.
///
/// Every field arrives as raw form text except the age; [`Self::validate`]
/// turns it into a [`StopLog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLogForm {
    pub stop_date: String,
    pub stop_time: String,
    pub country_name: String,
    /// `M` or `F`.
    pub driver_gender: String,
    pub driver_age: i64,
    pub driver_race: String,
    /// `Yes` or `No`.
    pub search_conducted: String,
    pub search_type: String,
    /// `Yes` or `No`.
    pub drugs_related_stop: String,
    pub stop_duration: String,
    pub vehicle_number: String,
}

impl StopLogForm {
    /// Validates the submission.
    ///
    /// # Errors
    ///
    /// Returns the first [`StopLogError`] found, checking fields in form
    /// order.
    pub fn validate(&self) -> Result<StopLog, StopLogError> {
        Ok(StopLog {
            stop_date: parse_stop_date(&self.stop_date)?,
            stop_time: parse_stop_time(&self.stop_time)?,
            country_name: self.country_name.trim().to_string(),
            driver_gender: parse_gender(&self.driver_gender)?,
            driver_age: parse_age(self.driver_age)?,
            driver_race: self.driver_race.trim().to_string(),
            search_conducted: parse_answer("search_conducted", &self.search_conducted)?,
            search_type: self.search_type.trim().to_string(),
            drugs_related_stop: parse_answer("drugs_related_stop", &self.drugs_related_stop)?,
            stop_duration: parse_duration(&self.stop_duration)?,
            vehicle_number: self.vehicle_number.trim().to_string(),
        })
    }
}

/// Prediction for a submitted log, with its confirmation narrative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPrediction {
    pub prediction: Prediction,
    pub summary: String,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use securecheck_stop_models::{Gender, StopDuration};

    fn form() -> StopLogForm {
        StopLogForm {
            stop_date: "2024-03-09".to_string(),
            stop_time: "14:05".to_string(),
            country_name: "Canada".to_string(),
            driver_gender: "M".to_string(),
            driver_age: 30,
            driver_race: "Asian".to_string(),
            search_conducted: "No".to_string(),
            search_type: "None".to_string(),
            drugs_related_stop: "Yes".to_string(),
            stop_duration: "6-15 Min".to_string(),
            vehicle_number: "AB123".to_string(),
        }
    }

    #[test]
    fn valid_form_becomes_stop_log() {
        let log = form().validate().unwrap();
        assert_eq!(log.driver_gender, Gender::Male);
        assert_eq!(log.driver_age, 30);
        assert!(!log.search_conducted);
        assert!(log.drugs_related_stop);
        assert_eq!(log.stop_duration, StopDuration::SixToFifteen);
        assert_eq!(log.stop_date.to_string(), "2024-03-09");
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        let mut form = form();
        form.driver_age = 15;
        assert_eq!(
            form.validate(),
            Err(StopLogError::AgeOutOfRange { age: 15 })
        );
        form.driver_age = 101;
        assert!(form.validate().is_err());
        form.driver_age = 100;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn bad_answer_names_its_field() {
        let mut form = form();
        form.search_conducted = "maybe".to_string();
        assert_eq!(
            form.validate(),
            Err(StopLogError::InvalidAnswer {
                field: "search_conducted",
                value: "maybe".to_string(),
            })
        );
    }

    #[test]
    fn form_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "stopDate": "2024-03-09",
            "stopTime": "14:05:00",
            "countryName": "India",
            "driverGender": "F",
            "driverAge": 22,
            "driverRace": "Other",
            "searchConducted": "Yes",
            "searchType": "Frisk",
            "drugsRelatedStop": "No",
            "stopDuration": "30+ Min",
            "vehicleNumber": "XY9",
        });
        let form: StopLogForm = serde_json::from_value(json).unwrap();
        let log = form.validate().unwrap();
        assert_eq!(log.driver_gender, Gender::Female);
        assert_eq!(log.stop_duration, StopDuration::OverThirty);
    }

    #[test]
    fn empty_query_result_carries_warning() {
        let result = ApiQueryResult::new("label".to_string(), "SELECT 1".to_string(), &Table::new());
        assert_eq!(result.warning.as_deref(), Some(NO_DATA_WARNING));

        let table = Table::new().with_column("n", vec![Value::Int(1)]);
        let result = ApiQueryResult::new("label".to_string(), "SELECT 1".to_string(), &table);
        assert!(result.warning.is_none());
        assert_eq!(result.table.columns, ["n"]);
        assert_eq!(result.table.rows, [[Value::Int(1)]]);
    }

    #[test]
    fn metrics_carry_points() {
        let metrics = ApiMetrics::from(KeyMetrics {
            total_stops: 3,
            ..KeyMetrics::default()
        });
        assert_eq!(metrics.points.len(), 4);
        assert_eq!(metrics.points[0].value, 3);
    }
}
