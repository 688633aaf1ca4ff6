#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static catalog of canned analytical SQL queries over traffic stops.
//!
//! The dashboard offers two independent dropdowns: fourteen "medium"
//! questions ([`MediumQuery`]) and six "advanced" ones ([`AdvancedQuery`]).
//! Each variant maps to a complete SQL statement embedded from
//! `queries/<registry>/*.sql`. Nothing is substituted at runtime; the text
//! is shown to the user verbatim and handed to the data source as-is.
//!
//! Selection by human-readable label goes through [`QueryRegistry`], which
//! only accepts labels from its own set.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors that can occur during catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The label is not registered in the given registry.
    #[error("Unknown {registry} query label: '{label}'")]
    UnknownLabel {
        registry: QueryRegistry,
        label: String,
    },
}

/// A fixed set of labelled SQL statements.
pub trait CannedQuery: Copy + Sized + 'static {
    /// Returns all queries in display order.
    fn all() -> &'static [Self];

    /// Human-readable label shown in the query picker.
    fn label(self) -> &'static str;

    /// The SQL statement text.
    fn sql(self) -> &'static str;

    /// Finds the query with exactly this label.
    #[must_use]
    fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|q| q.label() == label)
    }
}

/// The fourteen vehicle, demographic, time, violation, and location
/// questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediumQuery {
    DrugStopVehicles,
    MostSearchedVehicles,
    AgeWithHighestArrestRate,
    GenderByCountry,
    RaceGenderSearchRate,
    BusiestHours,
    AverageDurationByViolation,
    NightArrestRate,
    ViolationSearchesAndArrests,
    YoungDriverViolations,
    RarelySearchedViolations,
    DrugStopRateByCountry,
    ArrestRateByCountryAndViolation,
    SearchesByCountry,
}

impl CannedQuery for MediumQuery {
    fn all() -> &'static [Self] {
        &[
            Self::DrugStopVehicles,
            Self::MostSearchedVehicles,
            Self::AgeWithHighestArrestRate,
            Self::GenderByCountry,
            Self::RaceGenderSearchRate,
            Self::BusiestHours,
            Self::AverageDurationByViolation,
            Self::NightArrestRate,
            Self::ViolationSearchesAndArrests,
            Self::YoungDriverViolations,
            Self::RarelySearchedViolations,
            Self::DrugStopRateByCountry,
            Self::ArrestRateByCountryAndViolation,
            Self::SearchesByCountry,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::DrugStopVehicles => {
                "🚗Vehicle-Based - 1.What are the top 10 vehicle_Number involved in drug-related stops?"
            }
            Self::MostSearchedVehicles => {
                "🚕Vehicle-Based - 2.Which vehicles were most frequently searched?"
            }
            Self::AgeWithHighestArrestRate => {
                "🧍 Demographic-Based--3.Which driver age group had the highest arrest rate?"
            }
            Self::GenderByCountry => {
                "🧍 Demographic-Based--4.What is the gender distribution of drivers stopped in each country?"
            }
            Self::RaceGenderSearchRate => {
                "🧍 Demographic-Based--5.Which race and gender combination has the highest search rate?"
            }
            Self::BusiestHours => {
                "🕐Time & Duration Based--6.What time of day sees the most traffic stops?"
            }
            Self::AverageDurationByViolation => {
                "🕑Time & Duration Based - 7.What is the average stop duration for different violations?"
            }
            Self::NightArrestRate => {
                "🕒Time & Duration Based 8.Are stops during the night more likely to lead to arrests?"
            }
            Self::ViolationSearchesAndArrests => {
                "🔫Violation-Based 9. Which violations are most associated with searches or arrests?"
            }
            Self::YoungDriverViolations => {
                "🔫Violation-Based 10. Which violations are most common among younger drivers (<25)?"
            }
            Self::RarelySearchedViolations => {
                "🔫Violation-Based 11.Is there a violation that rarely results in search or arrest?"
            }
            Self::DrugStopRateByCountry => {
                "🌏Location-Based 12.Which countries report the highest rate of drug-related stops?"
            }
            Self::ArrestRateByCountryAndViolation => {
                "🌏Location-Based 13.What is the arrest rate by country and violation?"
            }
            Self::SearchesByCountry => {
                "🌏Location-Based 14.Which country has the most stops with search conducted?"
            }
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::DrugStopVehicles => include_str!("../queries/medium/01_drug_stop_vehicles.sql"),
            Self::MostSearchedVehicles => {
                include_str!("../queries/medium/02_most_searched_vehicles.sql")
            }
            Self::AgeWithHighestArrestRate => {
                include_str!("../queries/medium/03_age_highest_arrest_rate.sql")
            }
            Self::GenderByCountry => include_str!("../queries/medium/04_gender_by_country.sql"),
            Self::RaceGenderSearchRate => {
                include_str!("../queries/medium/05_race_gender_search_rate.sql")
            }
            Self::BusiestHours => include_str!("../queries/medium/06_busiest_hours.sql"),
            Self::AverageDurationByViolation => {
                include_str!("../queries/medium/07_average_duration_by_violation.sql")
            }
            Self::NightArrestRate => include_str!("../queries/medium/08_night_arrest_rate.sql"),
            Self::ViolationSearchesAndArrests => {
                include_str!("../queries/medium/09_violations_searches_arrests.sql")
            }
            Self::YoungDriverViolations => {
                include_str!("../queries/medium/10_young_driver_violations.sql")
            }
            Self::RarelySearchedViolations => {
                include_str!("../queries/medium/11_rarely_searched_violations.sql")
            }
            Self::DrugStopRateByCountry => {
                include_str!("../queries/medium/12_drug_stop_rate_by_country.sql")
            }
            Self::ArrestRateByCountryAndViolation => {
                include_str!("../queries/medium/13_arrest_rate_by_country_violation.sql")
            }
            Self::SearchesByCountry => include_str!("../queries/medium/14_searches_by_country.sql"),
        }
    }
}

/// The six window-function, subquery, and date-function analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvancedQuery {
    YearlyStopsAndArrestsByCountry,
    ViolationTrendsByAgeAndRace,
    TimePeriodAnalysis,
    ViolationSearchAndArrestRanks,
    DemographicsByCountry,
    TopViolationArrestRates,
}

impl CannedQuery for AdvancedQuery {
    fn all() -> &'static [Self] {
        &[
            Self::YearlyStopsAndArrestsByCountry,
            Self::ViolationTrendsByAgeAndRace,
            Self::TimePeriodAnalysis,
            Self::ViolationSearchAndArrestRanks,
            Self::DemographicsByCountry,
            Self::TopViolationArrestRates,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::YearlyStopsAndArrestsByCountry => {
                "1.Yearly Breakdown of Stops and Arrests by Country (Using Subquery and Window Functions)"
            }
            Self::ViolationTrendsByAgeAndRace => {
                "2.Driver Violation Trends Based on Age and Race (Join with Subquery)"
            }
            Self::TimePeriodAnalysis => {
                "3.Time Period Analysis of Stops (Joining with Date Functions) , Number of Stops by Year,Month, Hour of the Day"
            }
            Self::ViolationSearchAndArrestRanks => {
                "4.Violations with High Search and Arrest Rates (Window Function)"
            }
            Self::DemographicsByCountry => "5.Driver Demographics by Country (Age, Gender, and Race)",
            Self::TopViolationArrestRates => "6.Top 5 Violations with Highest Arrest Rates",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::YearlyStopsAndArrestsByCountry => {
                include_str!("../queries/advanced/01_yearly_stops_arrests_by_country.sql")
            }
            Self::ViolationTrendsByAgeAndRace => {
                include_str!("../queries/advanced/02_violation_trends_age_race.sql")
            }
            Self::TimePeriodAnalysis => {
                include_str!("../queries/advanced/03_time_period_analysis.sql")
            }
            Self::ViolationSearchAndArrestRanks => {
                include_str!("../queries/advanced/04_violation_search_arrest_ranks.sql")
            }
            Self::DemographicsByCountry => {
                include_str!("../queries/advanced/05_demographics_by_country.sql")
            }
            Self::TopViolationArrestRates => {
                include_str!("../queries/advanced/06_top_violation_arrest_rates.sql")
            }
        }
    }
}

/// One of the two independent query pickers.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QueryRegistry {
    Medium,
    Advanced,
}

impl QueryRegistry {
    /// Returns both registries.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Medium, Self::Advanced]
    }

    /// Lists the labels of this registry in display order.
    #[must_use]
    pub fn list_labels(self) -> Vec<&'static str> {
        match self {
            Self::Medium => labels::<MediumQuery>(),
            Self::Advanced => labels::<AdvancedQuery>(),
        }
    }

    /// Resolves a label to its SQL text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownLabel`] if the label is not part of
    /// this registry.
    pub fn resolve(self, label: &str) -> Result<&'static str, CatalogError> {
        let sql = match self {
            Self::Medium => MediumQuery::from_label(label).map(CannedQuery::sql),
            Self::Advanced => AdvancedQuery::from_label(label).map(CannedQuery::sql),
        };

        sql.ok_or_else(|| CatalogError::UnknownLabel {
            registry: self,
            label: label.to_string(),
        })
    }
}

fn labels<Q: CannedQuery>() -> Vec<&'static str> {
    Q::all().iter().map(|q| q.label()).collect()
}
