//! `POST /v1/crawler/status` and its two per-date listings (spec.md §6, §8
//! scenario 1: at most one `SUCCESS` run per `(chain_name, crawl_date)`).

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use polica_common::RunStatus;
use polica_entities::CrawlRun;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::ServiceAuth;
use crate::errors::AppError;
use crate::infra::repositories::crawl_run::{self, CrawlStatusReport};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CrawlerStatusRequest {
    pub chain_name: String,
    pub crawl_date: NaiveDate,
    pub status: RunStatus,
    pub error_message: Option<String>,
    pub n_stores: i32,
    pub n_products: i32,
    pub n_prices: i32,
    pub elapsed_time: f64,
}

#[utoipa::path(
    post,
    path = "/v1/crawler/status",
    request_body = CrawlerStatusRequest,
    responses((status = 200, description = "Crawl run status recorded", body = CrawlRun))
)]
pub async fn report_status(
    State(state): State<AppState>,
    _svc: ServiceAuth,
    Json(body): Json<CrawlerStatusRequest>,
) -> Result<Json<CrawlRun>, AppError> {
    let run = crawl_run::report_status(
        &state.pool,
        CrawlStatusReport {
            chain_name: body.chain_name,
            crawl_date: body.crawl_date,
            status: body.status,
            error: body.error_message,
            n_stores: body.n_stores,
            n_products: body.n_products,
            n_prices: body.n_prices,
            elapsed: body.elapsed_time,
        },
    )
    .await?;
    Ok(Json(run))
}

#[utoipa::path(
    get,
    path = "/v1/crawler/successful_runs/{date}",
    params(("date" = NaiveDate, Path, description = "Crawl date")),
    responses((status = 200, description = "Successful crawl runs for the date", body = [CrawlRun]))
)]
pub async fn successful_runs(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<CrawlRun>>, AppError> {
    Ok(Json(crawl_run::successful_runs(&state.pool, date).await?))
}

#[utoipa::path(
    get,
    path = "/v1/crawler/failed_or_started_runs/{date}",
    params(("date" = NaiveDate, Path, description = "Crawl date")),
    responses((status = 200, description = "Failed or still-running crawl runs for the date", body = [CrawlRun]))
)]
pub async fn failed_or_started_runs(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<CrawlRun>>, AppError> {
    Ok(Json(crawl_run::failed_or_started_runs(&state.pool, date).await?))
}
