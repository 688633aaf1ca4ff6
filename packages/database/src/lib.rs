#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Postgres data source adapter for the traffic-stop dashboard.
//!
//! Uses `switchy_database` with a fresh connection per statement. Results
//! cross the boundary as JSON records (`row_to_json`) and are decoded into
//! a [`securecheck_database_models::Table`], so arbitrary result shapes from
//! the canned query catalog need no per-query row mapping.

pub mod db;
pub mod source;

pub use source::DataSource;

/// Errors that can occur while talking to the data source.
///
/// [`DataSource::execute`] absorbs all of these into an empty table;
/// [`DataSource::try_execute`] surfaces them.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The database could not be reached or the URL was unusable.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// The statement failed to execute.
    #[error("Query error: {0}")]
    Query(#[from] switchy_database::DatabaseError),

    /// A result record could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of what went wrong.
        message: String,
    },
}
