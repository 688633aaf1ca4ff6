//! Summary statistics over the cleaned record table.

use securecheck_analytics_models::{GenderCount, KeyMetrics};
use securecheck_database_models::{Table, Value};
use securecheck_stop_models::{ARREST_OUTCOME, StopDuration, columns};

use crate::cell_text;

/// Computes the four headline metrics.
///
/// Missing columns contribute zero; an empty table yields all zeros.
#[must_use]
pub fn key_metrics(table: &Table) -> KeyMetrics {
    let count_where = |name: &str, pred: fn(&Value) -> bool| -> u64 {
        table
            .column(name)
            .map_or(0, |c| c.values.iter().filter(|v| pred(v)).count() as u64)
    };

    KeyMetrics {
        total_stops: table.len() as u64,
        total_arrests: count_where(columns::STOP_OUTCOME, |v| {
            v.as_text() == Some(ARREST_OUTCOME)
        }),
        total_searches: count_where(columns::SEARCH_CONDUCTED, |v| v.as_bool() == Some(true)),
        violation_types: table
            .column(columns::VIOLATION)
            .map_or(0, |c| distinct(c.present()).len() as u64),
    }
}

/// Counts stops per `driver_gender` value for the distribution chart.
///
/// Sorted by count descending; equal counts keep the order in which the
/// values first appear.
#[must_use]
pub fn gender_distribution(table: &Table) -> Vec<GenderCount> {
    let Some(column) = table.column(columns::DRIVER_GENDER) else {
        return Vec::new();
    };

    let mut counts: Vec<GenderCount> = Vec::new();
    for gender in column.present().filter_map(cell_text) {
        if let Some(entry) = counts.iter_mut().find(|c| c.gender == gender) {
            entry.count += 1;
        } else {
            counts.push(GenderCount { gender, count: 1 });
        }
    }

    // stable sort preserves first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Options offered for the form's stop duration picker.
///
/// Distinct `stop_duration` values present in the table, sorted; the
/// fixed duration set when the table has none.
#[must_use]
pub fn stop_duration_options(table: &Table) -> Vec<String> {
    let mut options: Vec<String> = table
        .column(columns::STOP_DURATION)
        .map(|c| {
            distinct(c.present())
                .into_iter()
                .filter_map(cell_text)
                .collect()
        })
        .unwrap_or_default();

    if options.is_empty() {
        return StopDuration::all().iter().map(ToString::to_string).collect();
    }

    options.sort();
    options
}

fn distinct<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut seen: Vec<&Value> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
