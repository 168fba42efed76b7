use chrono::NaiveDate;
use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use polica_common::RunStatus;
use polica_entities::{adapt_infra_error, ImportCounters, ImportRun, InfraError};

/// One reported status update, as posted by the importer to
/// `POST /v1/importer/status` (spec.md §6). Idempotent on
/// `(chain_name, import_date)`, same upsert shape as the crawler's.
pub struct ImportStatusReport {
    pub crawl_run_id: Option<Uuid>,
    pub chain_name: String,
    pub import_date: NaiveDate,
    pub status: RunStatus,
    pub error: Option<String>,
    pub counters: ImportCounters,
    pub elapsed: f64,
}

pub async fn report_status(pool: &Pool, report: ImportStatusReport) -> Result<ImportRun, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| {
        let existing = ImportRun::get_by_chain_and_date(conn, &report.chain_name, report.import_date)?;
        let run = match existing {
            Some(run) => run,
            None => {
                match ImportRun::try_start(conn, report.crawl_run_id, &report.chain_name, report.import_date, None)? {
                    Some(run) => run,
                    // Lost a race with a concurrent status report for the same key.
                    None => ImportRun::get_by_chain_and_date(conn, &report.chain_name, report.import_date)?
                        .ok_or(diesel::result::Error::NotFound)?,
                }
            }
        };
        if report.status.is_terminal() {
            ImportRun::finish(conn, run.id, report.status, report.error, report.counters, report.elapsed)
        } else {
            Ok(run)
        }
    })
    .await
    .map_err(adapt_infra_error)?
    .map_err(adapt_infra_error)
}

/// Backs the importer-status list endpoints (spec.md §6).
pub async fn successful_runs(pool: &Pool, import_date: NaiveDate) -> Result<Vec<ImportRun>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ImportRun::successful_runs(conn, import_date))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn failed_or_started_runs(
    pool: &Pool,
    import_date: NaiveDate,
) -> Result<Vec<ImportRun>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| ImportRun::failed_or_started_runs(conn, import_date))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
