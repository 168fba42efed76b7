//! `POST /v1/importer/status` and its lookups (spec.md §6, §8 scenario 2:
//! re-running a `SUCCESS` import for the same `(chain_name, import_date)`
//! is a no-op `SKIPPED` rather than a new row).

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use polica_common::RunStatus;
use polica_entities::{ImportCounters, ImportRun};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::ServiceAuth;
use crate::errors::AppError;
use crate::infra::repositories::import_run::{self, ImportStatusReport};
use crate::state::AppState;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImporterStatusRequest {
    pub crawl_run_id: Option<Uuid>,
    pub chain_name: String,
    pub import_date: NaiveDate,
    pub status: RunStatus,
    pub error_message: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub counters: ImportCounters,
    pub elapsed_time: f64,
}

#[utoipa::path(
    post,
    path = "/v1/importer/status",
    request_body = ImporterStatusRequest,
    responses((status = 200, description = "Import run status recorded", body = ImportRun))
)]
pub async fn report_status(
    State(state): State<AppState>,
    _svc: ServiceAuth,
    Json(body): Json<ImporterStatusRequest>,
) -> Result<Json<ImportRun>, AppError> {
    let run = import_run::report_status(
        &state.pool,
        ImportStatusReport {
            crawl_run_id: body.crawl_run_id,
            chain_name: body.chain_name,
            import_date: body.import_date,
            status: body.status,
            error: body.error_message,
            counters: body.counters,
            elapsed: body.elapsed_time,
        },
    )
    .await?;
    Ok(Json(run))
}

#[utoipa::path(
    get,
    path = "/v1/importer/status/{chain}/{date}",
    params(
        ("chain" = String, Path, description = "Chain name"),
        ("date" = NaiveDate, Path, description = "Import date")
    ),
    responses(
        (status = 200, description = "Import run for the chain/date", body = ImportRun),
        (status = 404, description = "No import run recorded for this chain/date")
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path((chain, date)): Path<(String, NaiveDate)>,
) -> Result<Json<ImportRun>, AppError> {
    let conn = state.pool.get().await.map_err(polica_entities::adapt_infra_error)?;
    let run = conn
        .interact(move |conn| ImportRun::get_by_chain_and_date(conn, &chain, date))
        .await
        .map_err(polica_entities::adapt_infra_error)?
        .map_err(polica_entities::adapt_infra_error)?
        .ok_or(polica_entities::InfraError::NotFound)?;
    Ok(Json(run))
}

#[utoipa::path(
    get,
    path = "/v1/importer/successful_runs/{date}",
    params(("date" = NaiveDate, Path, description = "Import date")),
    responses((status = 200, description = "Successful import runs for the date", body = [ImportRun]))
)]
pub async fn successful_runs(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<ImportRun>>, AppError> {
    Ok(Json(import_run::successful_runs(&state.pool, date).await?))
}

#[utoipa::path(
    get,
    path = "/v1/importer/failed_or_started_runs/{date}",
    params(("date" = NaiveDate, Path, description = "Import date")),
    responses((status = 200, description = "Failed or still-running import runs for the date", body = [ImportRun]))
)]
pub async fn failed_or_started_runs(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<ImportRun>>, AppError> {
    Ok(Json(import_run::failed_or_started_runs(&state.pool, date).await?))
}
