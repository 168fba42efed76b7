use chrono::NaiveDate;
use deadpool_diesel::postgres::Pool;

use polica_common::RunStatus;
use polica_entities::{adapt_infra_error, CrawlRun, InfraError};

/// One reported status update, as posted by the crawler to
/// `POST /v1/crawler/status` (spec.md §6). Idempotent: a first report for a
/// `(chain_name, crawl_date)` pair opens the run; any later report
/// transitions the same row, so retried status posts never create
/// duplicates.
pub struct CrawlStatusReport {
    pub chain_name: String,
    pub crawl_date: NaiveDate,
    pub status: RunStatus,
    pub error: Option<String>,
    pub n_stores: i32,
    pub n_products: i32,
    pub n_prices: i32,
    pub elapsed: f64,
}

pub async fn report_status(pool: &Pool, report: CrawlStatusReport) -> Result<CrawlRun, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| {
        let existing = CrawlRun::latest_for_chain_and_date(conn, &report.chain_name, report.crawl_date)?;
        let run = match existing {
            Some(run) => run,
            None => CrawlRun::start(conn, &report.chain_name, report.crawl_date)?,
        };
        if report.status.is_terminal() {
            CrawlRun::finish(
                conn,
                run.id,
                report.status,
                report.error,
                report.n_stores,
                report.n_products,
                report.n_prices,
                report.elapsed,
            )
        } else {
            Ok(run)
        }
    })
    .await
    .map_err(adapt_infra_error)?
    .map_err(adapt_infra_error)
}

/// Backs `GET /v1/crawler/successful_runs/{date}` (spec.md §6).
pub async fn successful_runs(pool: &Pool, crawl_date: NaiveDate) -> Result<Vec<CrawlRun>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| CrawlRun::successful_runs(conn, crawl_date))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

/// Backs `GET /v1/crawler/failed_or_started_runs/{date}` (spec.md §6).
pub async fn failed_or_started_runs(
    pool: &Pool,
    crawl_date: NaiveDate,
) -> Result<Vec<CrawlRun>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| CrawlRun::failed_or_started_runs(conn, crawl_date))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
