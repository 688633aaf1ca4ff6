//! Outcome lookup for a submitted police log.
//!
//! Not a model: the historical stops that match the submission exactly on
//! gender, age, search, duration, and drug involvement vote, and the most
//! frequent `stop_outcome` and `violation` among them win.

use securecheck_analytics_models::{
    FALLBACK_OUTCOME, FALLBACK_VIOLATION, FilterCriteria, Prediction,
};
use securecheck_database_models::{Table, Value};
use securecheck_stop_models::columns;

use crate::cell_text;

/// Predicts the outcome and violation for `criteria`.
///
/// Returns [`Prediction::fallback`] when no row matches. Ties between
/// equally frequent values go to the value encountered first in row
/// order.
#[must_use]
pub fn predict(table: &Table, criteria: &FilterCriteria) -> Prediction {
    let rows = matching_rows(table, criteria);
    if rows.is_empty() {
        log::debug!("No historical stops match {criteria:?}, using fallback prediction");
        return Prediction::fallback();
    }

    Prediction {
        stop_outcome: mode(table, &rows, columns::STOP_OUTCOME)
            .unwrap_or_else(|| FALLBACK_OUTCOME.to_string()),
        violation: mode(table, &rows, columns::VIOLATION)
            .unwrap_or_else(|| FALLBACK_VIOLATION.to_string()),
        matched_rows: rows.len() as u64,
    }
}

/// Indices of rows equal to `criteria` on every filtered column, in row
/// order.
///
/// A filtered column missing from the table matches nothing.
#[must_use]
pub fn matching_rows(table: &Table, criteria: &FilterCriteria) -> Vec<usize> {
    let gender = Value::Text(criteria.driver_gender.clone());
    let age = Value::Int(criteria.driver_age);
    let searched = Value::Bool(criteria.search_conducted);
    let duration = Value::Text(criteria.stop_duration.clone());
    let drugs = Value::Bool(criteria.drugs_related_stop);

    let predicates = [
        (columns::DRIVER_GENDER, &gender),
        (columns::DRIVER_AGE, &age),
        (columns::SEARCH_CONDUCTED, &searched),
        (columns::STOP_DURATION, &duration),
        (columns::DRUGS_RELATED_STOP, &drugs),
    ];

    let mut filters = Vec::with_capacity(predicates.len());
    for (name, expected) in predicates {
        let Some(column) = table.column(name) else {
            return Vec::new();
        };
        filters.push((&column.values, expected));
    }

    (0..table.len())
        .filter(|&row| filters.iter().all(|(values, expected)| values[row] == **expected))
        .collect()
}

/// Most frequent non-null value of `name` among `rows`.
fn mode(table: &Table, rows: &[usize], name: &str) -> Option<String> {
    let column = table.column(name)?;

    // (value, count) in first-appearance order
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for value in rows.iter().map(|&row| &column.values[row]) {
        if value.is_null() {
            continue;
        }
        if let Some(entry) = counts.iter_mut().find(|(v, _)| *v == value) {
            entry.1 += 1;
        } else {
            counts.push((value, 1));
        }
    }

    let mut best: Option<(&Value, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }

    best.and_then(|(value, _)| cell_text(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            driver_gender: "M".to_string(),
            driver_age: 30,
            search_conducted: false,
            stop_duration: "0-5 Min".to_string(),
            drugs_related_stop: false,
        }
    }

    /// Rows 0, 1, and 3 match [`criteria`]; row 2 differs on age.
    fn history() -> Table {
        Table::new()
            .with_column("driver_gender", vec![text("M"), text("M"), text("M"), text("M")])
            .with_column(
                "driver_age",
                vec![Value::Int(30), Value::Int(30), Value::Int(31), Value::Int(30)],
            )
            .with_column("search_conducted", vec![Value::Bool(false); 4])
            .with_column("stop_duration", vec![text("0-5 Min"); 4])
            .with_column("drugs_related_stop", vec![Value::Bool(false); 4])
            .with_column(
                "stop_outcome",
                vec![text("Arrest"), text("Arrest"), text("Ticket"), text("Warning")],
            )
            .with_column(
                "violation",
                vec![text("Speeding"), text("DUI"), text("Seatbelt"), text("DUI")],
            )
    }

    #[test]
    fn majority_outcome_wins() {
        let prediction = predict(&history(), &criteria());
        assert_eq!(
            prediction,
            Prediction {
                stop_outcome: "Arrest".to_string(),
                violation: "DUI".to_string(),
                matched_rows: 3,
            }
        );
    }

    #[test]
    fn no_match_returns_fallback() {
        let mut criteria = criteria();
        criteria.driver_gender = "F".to_string();

        assert_eq!(predict(&history(), &criteria), Prediction::fallback());
    }

    #[test]
    fn ties_go_to_first_encountered_value() {
        let table = history().with_column(
            "violation",
            vec![text("Seatbelt"), text("Speeding"), text("DUI"), text("Speeding")],
        );
        let table = table.with_column(
            "stop_outcome",
            vec![text("Warning"), text("Ticket"), text("Arrest"), text("Ticket")],
        );
        // rows 0, 1, 3: Seatbelt x1, Speeding x2 / Warning x1, Ticket x2
        let prediction = predict(&table, &criteria());
        assert_eq!(prediction.violation, "Speeding");
        assert_eq!(prediction.stop_outcome, "Ticket");

        let even = history().with_column(
            "violation",
            vec![text("Seatbelt"), text("Speeding"), text("DUI"), text("DUI")],
        );
        // rows 0, 1, 3: Seatbelt, Speeding, DUI once each
        assert_eq!(predict(&even, &criteria()).violation, "Seatbelt");
    }

    #[test]
    fn missing_filter_column_matches_nothing() {
        let mut table = history();
        table.retain_columns(|c| c.name != "stop_duration");

        assert!(matching_rows(&table, &criteria()).is_empty());
        assert_eq!(predict(&table, &criteria()), Prediction::fallback());
    }

    #[test]
    fn absent_target_column_falls_back_per_field() {
        let mut table = history();
        table.retain_columns(|c| c.name != "stop_outcome");

        let prediction = predict(&table, &criteria());
        assert_eq!(prediction.stop_outcome, FALLBACK_OUTCOME);
        assert_eq!(prediction.violation, "DUI");
        assert_eq!(prediction.matched_rows, 3);
    }

    #[test]
    fn lookup_does_not_touch_the_table() {
        let table = history();
        let before = table.clone();
        let _ = predict(&table, &criteria());
        assert_eq!(table, before);
    }
}
