#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the SecureCheck dashboard.
//!
//! Serves the cleaned record table, the summary metrics and charts, the
//! canned query catalog, and the outcome lookup for submitted police logs
//! as JSON under `/api`.

mod handlers;

use std::sync::{Arc, PoisonError, RwLock};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use securecheck_analytics::{load_record_table, try_load_record_table};
use securecheck_database::{DataSource, DbError};
use securecheck_database_models::Table;

/// Shared application state.
pub struct AppState {
    /// Data source used for loads and canned query runs.
    pub source: DataSource,
    /// Current cleaned record table. Handlers clone the `Arc` and release
    /// the lock before computing.
    records: RwLock<Arc<Table>>,
}

impl AppState {
    /// Creates state holding an already loaded record table.
    #[must_use]
    pub fn new(source: DataSource, records: Table) -> Self {
        Self {
            source,
            records: RwLock::new(Arc::new(records)),
        }
    }

    /// Loads and cleans the record table from `source`.
    pub async fn load(source: DataSource) -> Self {
        let records = load_record_table(&source).await;
        Self::new(source, records)
    }

    /// Returns the current record table snapshot.
    #[must_use]
    pub fn records(&self) -> Arc<Table> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-fetches the record table and replaces the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the table cannot be loaded. The current
    /// snapshot is left in place.
    pub async fn refresh(&self) -> Result<Arc<Table>, DbError> {
        let fresh = Arc::new(try_load_record_table(&self.source).await?);
        *self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        Ok(fresh)
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/records", web::get().to(handlers::records))
            .route("/records/refresh", web::post().to(handlers::refresh_records))
            .route("/metrics", web::get().to(handlers::metrics))
            .route("/charts/gender", web::get().to(handlers::gender_chart))
            .route("/stop-durations", web::get().to(handlers::stop_durations))
            .route("/queries/{registry}", web::get().to(handlers::list_queries))
            .route("/queries/{registry}/sql", web::get().to(handlers::query_sql))
            .route("/queries/{registry}/run", web::post().to(handlers::run_query))
            .route("/predict", web::post().to(handlers::predict)),
    );
}

/// Starts the SecureCheck API server.
///
/// Loads the record table from `DATABASE_URL` and starts the Actix-Web
/// HTTP server. An unreachable database is not fatal: the server starts
/// with an empty table and `POST /api/records/refresh` can load it later.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading stop records...");
    let state = web::Data::new(AppState::load(DataSource::from_env()).await);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
