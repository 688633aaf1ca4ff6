#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard metric and prediction result types.

use securecheck_stop_models::StopLog;
use serde::{Deserialize, Serialize};

/// Outcome predicted when no historical stop matches the criteria.
pub const FALLBACK_OUTCOME: &str = "Warning";

/// Violation predicted when no historical stop matches the criteria.
pub const FALLBACK_VIOLATION: &str = "Speeding";

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Number of stop records.
    pub total_stops: u64,
    /// Stops whose outcome was an arrest.
    pub total_arrests: u64,
    /// Stops where a search was conducted.
    pub total_searches: u64,
    /// Distinct violation values.
    pub violation_types: u64,
}

impl KeyMetrics {
    /// Returns the metrics as labelled bars for the summary chart.
    #[must_use]
    pub fn points(&self) -> Vec<MetricPoint> {
        [
            ("Total Stops", self.total_stops),
            ("Total Arrests", self.total_arrests),
            ("Total Searches", self.total_searches),
            ("Violation Types", self.violation_types),
        ]
        .into_iter()
        .map(|(metric, value)| MetricPoint {
            metric: metric.to_string(),
            value,
        })
        .collect()
    }
}

/// A single labelled bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub metric: String,
    pub value: u64,
}

/// Number of stops for one `driver_gender` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderCount {
    pub gender: String,
    pub count: u64,
}

/// Equality predicates selecting comparable historical stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub driver_gender: String,
    pub driver_age: i64,
    pub search_conducted: bool,
    pub stop_duration: String,
    pub drugs_related_stop: bool,
}

impl From<&StopLog> for FilterCriteria {
    fn from(log: &StopLog) -> Self {
        Self {
            driver_gender: log.driver_gender.to_string(),
            driver_age: i64::from(log.driver_age),
            search_conducted: log.search_conducted,
            stop_duration: log.stop_duration.to_string(),
            drugs_related_stop: log.drugs_related_stop,
        }
    }
}

/// Most frequent outcome and violation among matching stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub stop_outcome: String,
    pub violation: String,
    /// Number of historical stops that matched; zero means the fallback
    /// pair was used.
    pub matched_rows: u64,
}

impl Prediction {
    /// The pair returned when nothing matches.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            stop_outcome: FALLBACK_OUTCOME.to_string(),
            violation: FALLBACK_VIOLATION.to_string(),
            matched_rows: 0,
        }
    }
}
