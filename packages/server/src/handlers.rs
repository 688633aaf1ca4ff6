//! HTTP handler functions for the SecureCheck API.

use actix_web::{HttpResponse, web};
use securecheck_analytics::{
    gender_distribution, key_metrics, predict as predict_outcome, stop_duration_options,
};
use securecheck_analytics_models::FilterCriteria;
use securecheck_catalog::QueryRegistry;
use securecheck_server_models::{
    ApiError, ApiHealth, ApiMetrics, ApiPrediction, ApiQueryList, ApiQueryResult, ApiQuerySql,
    ApiTable, QueryLabelParams, RunQueryRequest, StopLogForm,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/records`
///
/// Returns the cleaned record table.
pub async fn records(state: web::Data<AppState>) -> HttpResponse {
    let table = state.records();
    HttpResponse::Ok().json(ApiTable::from(table.as_ref()))
}

/// `POST /api/records/refresh`
///
/// Reloads the record table from the database and returns it. If the
/// database cannot be read, the current table is kept and 503 returned.
pub async fn refresh_records(state: web::Data<AppState>) -> HttpResponse {
    match state.refresh().await {
        Ok(table) => {
            log::info!("Record table refreshed: {} rows", table.len());
            HttpResponse::Ok().json(ApiTable::from(table.as_ref()))
        }
        Err(e) => {
            log::error!("Failed to refresh record table: {e}");
            HttpResponse::ServiceUnavailable().json(ApiError::new(
                "Failed to refresh records; the current records are unchanged",
            ))
        }
    }
}

/// `GET /api/metrics`
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let table = state.records();
    HttpResponse::Ok().json(ApiMetrics::from(key_metrics(&table)))
}

/// `GET /api/charts/gender`
pub async fn gender_chart(state: web::Data<AppState>) -> HttpResponse {
    let table = state.records();
    HttpResponse::Ok().json(gender_distribution(&table))
}

/// `GET /api/stop-durations`
///
/// Options for the log form's duration picker.
pub async fn stop_durations(state: web::Data<AppState>) -> HttpResponse {
    let table = state.records();
    HttpResponse::Ok().json(stop_duration_options(&table))
}

/// `GET /api/queries/{registry}`
pub async fn list_queries(path: web::Path<String>) -> HttpResponse {
    let registry = match parse_registry(&path) {
        Ok(registry) => registry,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(ApiQueryList {
        registry,
        labels: registry
            .list_labels()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    })
}

/// `GET /api/queries/{registry}/sql?label=`
///
/// Returns the SQL text behind a label without running it.
pub async fn query_sql(
    path: web::Path<String>,
    params: web::Query<QueryLabelParams>,
) -> HttpResponse {
    let registry = match parse_registry(&path) {
        Ok(registry) => registry,
        Err(response) => return response,
    };

    let QueryLabelParams { label } = params.into_inner();
    match registry.resolve(&label) {
        Ok(sql) => HttpResponse::Ok().json(ApiQuerySql {
            registry,
            label,
            sql: sql.to_string(),
        }),
        Err(e) => HttpResponse::NotFound().json(ApiError::new(e.to_string())),
    }
}

/// `POST /api/queries/{registry}/run`
///
/// Executes a canned query. An empty result, including one caused by a
/// database failure, carries a "no data" warning.
pub async fn run_query(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RunQueryRequest>,
) -> HttpResponse {
    let registry = match parse_registry(&path) {
        Ok(registry) => registry,
        Err(response) => return response,
    };

    let RunQueryRequest { label } = body.into_inner();
    let sql = match registry.resolve(&label) {
        Ok(sql) => sql,
        Err(e) => return HttpResponse::NotFound().json(ApiError::new(e.to_string())),
    };

    log::debug!("Running {registry} query '{label}'");
    let table = state.source.execute(sql).await;

    HttpResponse::Ok().json(ApiQueryResult::new(label, sql.to_string(), &table))
}

/// `POST /api/predict`
///
/// Validates a submitted police log and predicts its outcome and
/// violation from matching historical stops.
pub async fn predict(state: web::Data<AppState>, body: web::Json<StopLogForm>) -> HttpResponse {
    let stop_log = match body.validate() {
        Ok(stop_log) => stop_log,
        Err(e) => {
            log::debug!("Rejected police log: {e}");
            return HttpResponse::BadRequest().json(ApiError::new(e.to_string()));
        }
    };

    let table = state.records();
    let prediction = predict_outcome(&table, &FilterCriteria::from(&stop_log));

    HttpResponse::Ok().json(ApiPrediction {
        prediction,
        summary: stop_log.summary(),
    })
}

fn parse_registry(segment: &str) -> Result<QueryRegistry, HttpResponse> {
    segment.parse().map_err(|_| {
        HttpResponse::NotFound().json(ApiError::new(format!("Unknown query registry '{segment}'")))
    })
}
