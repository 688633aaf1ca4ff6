#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic-stop column names, categorical types, and the police log form.
//!
//! The `traffic_stops` table's snake_case column names are load-bearing:
//! the normalizer, the metrics, the prediction lookup, and the canned SQL
//! catalog all refer to them literally. They are defined once here.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the table holding the traffic-stop records.
pub const RECORD_TABLE: &str = "traffic_stops";

/// Column names of the `traffic_stops` table.
pub mod columns {
    pub const STOP_DATE: &str = "stop_date";
    pub const STOP_TIME: &str = "stop_time";
    pub const COUNTRY_NAME: &str = "country_name";
    pub const DRIVER_GENDER: &str = "driver_gender";
    pub const DRIVER_RACE: &str = "driver_race";
    pub const DRIVER_AGE: &str = "driver_age";
    pub const VIOLATION: &str = "violation";
    pub const SEARCH_CONDUCTED: &str = "search_conducted";
    pub const SEARCH_TYPE: &str = "search_type";
    pub const STOP_OUTCOME: &str = "stop_outcome";
    pub const DRUGS_RELATED_STOP: &str = "drugs_related_stop";
    pub const IS_ARRESTED: &str = "is_arrested";
    pub const STOP_DURATION: &str = "stop_duration";
    pub const VEHICLE_NUMBER: &str = "vehicle_number";
}

/// Text columns whose absent values are replaced with [`UNKNOWN`].
pub const STRING_NORMALIZE_COLUMNS: &[&str] = &[
    columns::DRIVER_GENDER,
    columns::DRIVER_RACE,
    columns::COUNTRY_NAME,
    columns::VIOLATION,
    columns::STOP_OUTCOME,
    columns::SEARCH_TYPE,
    columns::STOP_DURATION,
];

/// Flag columns whose absent values are replaced with `false`.
pub const BOOLEAN_NORMALIZE_COLUMNS: &[&str] = &[
    columns::SEARCH_CONDUCTED,
    columns::DRUGS_RELATED_STOP,
    columns::IS_ARRESTED,
];

/// Placeholder written into text columns that had no value.
pub const UNKNOWN: &str = "Unknown";

/// The `stop_outcome` value counted as an arrest.
pub const ARREST_OUTCOME: &str = "Arrest";

/// Youngest driver age accepted by the police log form.
pub const MIN_DRIVER_AGE: u8 = 16;

/// Oldest driver age accepted by the police log form.
pub const MAX_DRIVER_AGE: u8 = 100;

/// Driver gender as recorded in the `driver_gender` column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Gender {
    #[serde(rename = "M")]
    #[strum(serialize = "M")]
    Male,
    #[serde(rename = "F")]
    #[strum(serialize = "F")]
    Female,
}

impl Gender {
    /// Returns the spelled-out gender used in log summaries.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// A `"Yes"`/`"No"` answer from the police log form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    #[must_use]
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// How long a stop lasted, bucketed the way the `stop_duration` column
/// stores it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum StopDuration {
    #[serde(rename = "0-5 Min")]
    #[strum(serialize = "0-5 Min")]
    UpToFive,
    #[serde(rename = "6-15 Min")]
    #[strum(serialize = "6-15 Min")]
    SixToFifteen,
    #[serde(rename = "16-30 Min")]
    #[strum(serialize = "16-30 Min")]
    SixteenToThirty,
    #[serde(rename = "30+ Min")]
    #[strum(serialize = "30+ Min")]
    OverThirty,
}

impl StopDuration {
    /// Returns all variants of this enum, shortest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UpToFive,
            Self::SixToFifteen,
            Self::SixteenToThirty,
            Self::OverThirty,
        ]
    }
}

/// Errors raised while validating a submitted police log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StopLogError {
    #[error("Invalid driver gender '{value}': expected M or F")]
    InvalidGender { value: String },

    #[error("Driver age {age} out of range: expected 16-100")]
    AgeOutOfRange { age: i64 },

    #[error("Invalid answer '{value}' for {field}: expected Yes or No")]
    InvalidAnswer { field: &'static str, value: String },

    #[error("Invalid stop duration '{value}'")]
    InvalidDuration { value: String },

    #[error("Invalid stop date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Invalid stop time '{value}': expected HH:MM or HH:MM:SS")]
    InvalidTime { value: String },
}

/// A validated police log submission.
///
/// Only the gender, age, search, duration, and drug fields take part in
/// prediction; the rest are echoed back in [`StopLog::summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLog {
    pub stop_date: NaiveDate,
    pub stop_time: NaiveTime,
    pub country_name: String,
    pub driver_gender: Gender,
    pub driver_age: u8,
    pub driver_race: String,
    pub search_conducted: bool,
    pub search_type: String,
    pub drugs_related_stop: bool,
    pub stop_duration: StopDuration,
    pub vehicle_number: String,
}

impl StopLog {
    /// Renders the confirmation narrative shown after a log is submitted.
    #[must_use]
    pub fn summary(&self) -> String {
        let search_text = if self.search_conducted {
            "A search was conducted"
        } else {
            "No search was conducted"
        };
        let drug_text = if self.drugs_related_stop {
            "was a drug-related stop"
        } else {
            "was not a drug-related stop"
        };

        format!(
            "A {age}-year old {gender} driver in {country} was stopped at {time} on {date}. \
             {search_text}, and {drug_text}. \
             Stop duration: {duration}. Vehicle Number: {vehicle}.",
            age = self.driver_age,
            gender = self.driver_gender.full_name(),
            country = self.country_name,
            time = self.stop_time.format("%I:%M %p"),
            date = self.stop_date.format("%Y-%m-%d"),
            duration = self.stop_duration,
            vehicle = self.vehicle_number,
        )
    }
}

/// Parses a form gender code.
///
/// # Errors
///
/// Returns [`StopLogError::InvalidGender`] for anything but `M` or `F`.
pub fn parse_gender(value: &str) -> Result<Gender, StopLogError> {
    value
        .trim()
        .parse()
        .map_err(|_| StopLogError::InvalidGender {
            value: value.to_string(),
        })
}

/// Checks a form age against the accepted range.
///
/// # Errors
///
/// Returns [`StopLogError::AgeOutOfRange`] outside
/// [`MIN_DRIVER_AGE`]..=[`MAX_DRIVER_AGE`].
pub fn parse_age(age: i64) -> Result<u8, StopLogError> {
    u8::try_from(age)
        .ok()
        .filter(|a| (MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(a))
        .ok_or(StopLogError::AgeOutOfRange { age })
}

/// Parses a form `"Yes"`/`"No"` answer for the named field.
///
/// # Errors
///
/// Returns [`StopLogError::InvalidAnswer`] for any other text.
pub fn parse_answer(field: &'static str, value: &str) -> Result<bool, StopLogError> {
    value
        .trim()
        .parse::<Answer>()
        .map(Answer::as_bool)
        .map_err(|_| StopLogError::InvalidAnswer {
            field,
            value: value.to_string(),
        })
}

/// Parses a form stop duration.
///
/// # Errors
///
/// Returns [`StopLogError::InvalidDuration`] if the value is not one of
/// [`StopDuration::all`].
pub fn parse_duration(value: &str) -> Result<StopDuration, StopLogError> {
    value
        .trim()
        .parse()
        .map_err(|_| StopLogError::InvalidDuration {
            value: value.to_string(),
        })
}

/// Parses a form stop date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`StopLogError::InvalidDate`] if the date is malformed.
pub fn parse_stop_date(value: &str) -> Result<NaiveDate, StopLogError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| StopLogError::InvalidDate {
        value: value.to_string(),
    })
}

/// Parses a form stop time (`HH:MM` or `HH:MM:SS`).
///
/// # Errors
///
/// Returns [`StopLogError::InvalidTime`] if the time is malformed.
pub fn parse_stop_time(value: &str) -> Result<NaiveTime, StopLogError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| StopLogError::InvalidTime {
            value: value.to_string(),
        })
}
