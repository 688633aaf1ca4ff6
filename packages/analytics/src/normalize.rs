//! Cleaning pass applied once to the freshly loaded `traffic_stops` table.
//!
//! Each column has a fixed policy:
//!
//! * text columns in [`STRING_NORMALIZE_COLUMNS`] get [`UNKNOWN`] for
//!   absent cells,
//! * flag columns in [`BOOLEAN_NORMALIZE_COLUMNS`] are coerced to
//!   booleans, absent or unrecognized cells becoming `false`,
//! * `driver_age` is coerced to a non-negative integer, absent cells
//!   taking the column median,
//! * `stop_date` / `stop_time` are parsed into calendar dates and times
//!   of day, unparseable cells becoming null,
//! * columns with no value at all are dropped.
//!
//! Malformed cells never abort the pass. Columns a policy names but the
//! table lacks are skipped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use securecheck_database_models::{Column, Table, Value};
use securecheck_stop_models::{
    BOOLEAN_NORMALIZE_COLUMNS, STRING_NORMALIZE_COLUMNS, UNKNOWN, columns,
};

/// Age written into every `driver_age` cell when the column has no usable
/// value to take a median from.
pub const AGE_FALLBACK: i64 = 0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

/// Cleans a raw table.
///
/// Pure and deterministic. Applying it to its own output returns the same
/// table.
#[must_use]
pub fn normalize(mut table: Table) -> Table {
    // Date/time coercion runs before the all-absent drop so that a column
    // holding only unparseable text is dropped on the first pass rather
    // than the second.
    map_column(&mut table, columns::STOP_DATE, |v| {
        parse_date(v).map_or(Value::Null, Value::Date)
    });
    map_column(&mut table, columns::STOP_TIME, |v| {
        parse_time(v).map_or(Value::Null, Value::Time)
    });

    let before = table.column_names().len();
    table.retain_columns(|c| !c.is_all_null());
    let dropped = before - table.column_names().len();

    for name in STRING_NORMALIZE_COLUMNS {
        map_column(&mut table, name, |v| match v {
            Value::Null => Value::from(UNKNOWN),
            other => other.clone(),
        });
    }

    for name in BOOLEAN_NORMALIZE_COLUMNS {
        map_column(&mut table, name, |v| Value::Bool(coerce_bool(v).unwrap_or(false)));
    }

    if let Some(column) = table.column_mut(columns::DRIVER_AGE) {
        fill_ages(column);
    }

    log::debug!(
        "Normalized {} rows, {} columns kept, {} all-absent columns dropped",
        table.len(),
        table.column_names().len(),
        dropped
    );

    table
}

fn map_column(table: &mut Table, name: &str, f: impl Fn(&Value) -> Value) {
    if let Some(column) = table.column_mut(name) {
        for value in &mut column.values {
            *value = f(value);
        }
    }
}

/// Coerces ages to integers, filling gaps with the median of the values
/// that coerced cleanly.
#[allow(clippy::cast_possible_truncation)]
fn fill_ages(column: &mut Column) {
    let ages: Vec<Option<f64>> = column.values.iter().map(coerce_age).collect();

    let mut present: Vec<f64> = ages.iter().flatten().copied().collect();
    let fill = median(&mut present).map_or(AGE_FALLBACK, |m| m.trunc() as i64);

    column.values = ages
        .into_iter()
        .map(|age| Value::Int(age.map_or(fill, |a| a.trunc() as i64)))
        .collect();
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}

/// Numeric reading of an age cell. Negative, non-finite, and non-numeric
/// cells count as absent.
#[allow(clippy::cast_precision_loss)]
fn coerce_age(value: &Value) -> Option<f64> {
    let age = match value {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (age.is_finite() && age >= 0.0).then_some(age)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(i) => Some(*i != 0),
        Value::Float(f) => Some(*f != 0.0),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Timestamp(ts) => Some(ts.date()),
        Value::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| parse_datetime_text(s).map(|dt| dt.date()))
        }
        _ => None,
    }
}

fn parse_time(value: &Value) -> Option<NaiveTime> {
    match value {
        Value::Time(t) => Some(*t),
        Value::Timestamp(ts) => Some(ts.time()),
        Value::Text(s) => {
            let s = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                .or_else(|| parse_datetime_text(s).map(|dt| dt.time()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    fn raw_sample() -> Table {
        Table::new()
            .with_column(
                "stop_date",
                vec![text("2020-01-02"), text("bogus"), Value::Null, text("01/15/2021")],
            )
            .with_column(
                "stop_time",
                vec![text("14:30:00"), text("2020-01-02 08:05:00"), text("25:99"), Value::Null],
            )
            .with_column(
                "driver_gender",
                vec![text("M"), Value::Null, text("F"), Value::Null],
            )
            .with_column(
                "driver_age",
                vec![text("30"), Value::Null, text("abc"), Value::Int(40)],
            )
            .with_column(
                "search_conducted",
                vec![Value::Bool(true), Value::Null, text("False"), Value::Int(1)],
            )
            .with_column("search_type", vec![Value::Null; 4])
            .with_column(
                "vehicle_number",
                vec![text("A1"), Value::Null, text("C3"), text("D4")],
            )
    }

    #[test]
    fn fills_age_and_gender_from_the_documented_scenario() {
        let raw = Table::new()
            .with_column("driver_age", vec![text("30"), Value::Null])
            .with_column("driver_gender", vec![Value::Null, text("F")]);

        let clean = normalize(raw);

        assert_eq!(clean.value(0, "driver_age"), Some(&Value::Int(30)));
        assert_eq!(clean.value(0, "driver_gender"), Some(&text("Unknown")));
        assert_eq!(clean.value(1, "driver_age"), Some(&Value::Int(30)));
        assert_eq!(clean.value(1, "driver_gender"), Some(&text("F")));
    }

    #[test]
    fn drops_only_fully_absent_columns() {
        let clean = normalize(raw_sample());

        assert!(!clean.has_column("search_type"));
        assert!(clean.has_column("vehicle_number"));
        assert_eq!(clean.value(1, "vehicle_number"), Some(&Value::Null));
        assert_eq!(clean.len(), 4);
    }

    #[test]
    fn booleans_are_coerced_and_filled() {
        let clean = normalize(raw_sample());
        let flags: Vec<_> = clean
            .column("search_conducted")
            .unwrap()
            .values
            .iter()
            .map(Value::as_bool)
            .collect();

        assert_eq!(flags, [Some(true), Some(false), Some(false), Some(true)]);
    }

    #[test]
    fn unparseable_ages_take_the_median() {
        let clean = normalize(raw_sample());
        let ages: Vec<_> = clean
            .column("driver_age")
            .unwrap()
            .values
            .iter()
            .map(Value::as_int)
            .collect();

        // median of [30, 40] is 35
        assert_eq!(ages, [Some(30), Some(35), Some(35), Some(40)]);
    }

    #[test]
    fn negative_and_fractional_ages() {
        let raw = Table::new().with_column(
            "driver_age",
            vec![Value::Float(22.9), Value::Int(-4), text(" 31 ")],
        );
        let clean = normalize(raw);
        let ages: Vec<_> = clean
            .column("driver_age")
            .unwrap()
            .values
            .iter()
            .map(Value::as_int)
            .collect();

        // median of [22.9, 31] is 26.95, truncated to 26
        assert_eq!(ages, [Some(22), Some(26), Some(31)]);
    }

    #[test]
    fn ages_without_any_usable_value_fall_back_to_zero() {
        let raw = Table::new().with_column("driver_age", vec![text("n/a"), text("?")]);
        let clean = normalize(raw);

        assert_eq!(
            clean.column("driver_age").unwrap().values,
            [Value::Int(AGE_FALLBACK), Value::Int(AGE_FALLBACK)]
        );
    }

    #[test]
    fn dates_and_times_parse_or_become_null() {
        let clean = normalize(raw_sample());

        assert_eq!(
            clean.value(0, "stop_date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()))
        );
        assert_eq!(clean.value(1, "stop_date"), Some(&Value::Null));
        assert_eq!(
            clean.value(3, "stop_date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2021, 1, 15).unwrap()))
        );
        assert_eq!(
            clean.value(0, "stop_time"),
            Some(&Value::Time(NaiveTime::from_hms_opt(14, 30, 0).unwrap()))
        );
        assert_eq!(
            clean.value(1, "stop_time"),
            Some(&Value::Time(NaiveTime::from_hms_opt(8, 5, 0).unwrap()))
        );
        assert_eq!(clean.value(2, "stop_time"), Some(&Value::Null));
    }

    #[test]
    fn twelve_hour_times_parse() {
        assert_eq!(
            parse_time(&text("02:15 PM")),
            NaiveTime::from_hms_opt(14, 15, 0)
        );
        assert_eq!(
            parse_date(&text("2021-06-01T10:00:00+02:00")),
            NaiveDate::from_ymd_opt(2021, 6, 1)
        );
    }

    #[test]
    fn date_column_of_only_garbage_is_dropped() {
        let raw = Table::new()
            .with_column("stop_date", vec![text("soon"), text("later")])
            .with_column("violation", vec![text("Speeding"), Value::Null]);
        let clean = normalize(raw);

        assert!(!clean.has_column("stop_date"));
        assert_eq!(clean.value(1, "violation"), Some(&text("Unknown")));
    }

    #[test]
    fn missing_policy_columns_are_skipped() {
        let raw = Table::new().with_column("vehicle_number", vec![text("X9")]);
        let clean = normalize(raw.clone());
        assert_eq!(clean, raw);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let once = normalize(raw_sample());
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn policy_columns_hold_no_absent_values() {
        let raw = raw_sample()
            .with_column("stop_outcome", vec![Value::Null, text("Arrest"), Value::Null, Value::Null])
            .with_column("is_arrested", vec![Value::Null; 4]);
        let clean = normalize(raw);

        for name in STRING_NORMALIZE_COLUMNS {
            if let Some(column) = clean.column(name) {
                assert!(column.values.iter().all(|v| !v.is_null()), "{name} has nulls");
            }
        }
        for name in BOOLEAN_NORMALIZE_COLUMNS {
            if let Some(column) = clean.column(name) {
                assert!(
                    column.values.iter().all(|v| v.as_bool().is_some()),
                    "{name} has non-boolean cells"
                );
            }
        }
        assert!(
            clean
                .column("driver_age")
                .unwrap()
                .values
                .iter()
                .all(|v| v.as_int().is_some_and(|a| a >= 0))
        );
    }

    #[test]
    fn empty_table_stays_empty() {
        let clean = normalize(Table::new());
        assert!(clean.is_empty());
    }
}
