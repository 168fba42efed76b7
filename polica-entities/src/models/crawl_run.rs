use chrono::{DateTime, NaiveDate, Utc};
use diesel::{
    BoolExpressionMethods, ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable,
    RunQueryDsl, Selectable, SelectableHelper,
};
use polica_common::RunStatus;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::crawl_runs;

/// Audit row for one chain/date crawl attempt (spec.md §4.C, §8 scenario 1).
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = crawl_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CrawlRun {
    pub id: Uuid,
    pub chain_name: String,
    pub crawl_date: NaiveDate,
    pub status: String,
    pub error: Option<String>,
    pub n_stores: i32,
    pub n_products: i32,
    pub n_prices: i32,
    pub elapsed: f64,
    pub timestamp: DateTime<Utc>,
}

impl CrawlRun {
    pub fn status(&self) -> RunStatus {
        self.status.parse().unwrap_or(RunStatus::Failed)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crawl_runs)]
pub struct NewCrawlRun {
    pub chain_name: String,
    pub crawl_date: NaiveDate,
    pub status: String,
}

impl CrawlRun {
    /// Records the start of a crawl. Re-running a chain for a date that
    /// already has a `Started` row in progress still inserts a fresh row —
    /// `crawl_runs` has no uniqueness constraint, unlike `import_runs`, since
    /// a chain may legitimately be retried several times per day (spec.md §8).
    pub fn start(conn: &mut PgConnection, chain_name: &str, crawl_date: NaiveDate) -> DieselResult<CrawlRun> {
        diesel::insert_into(crawl_runs::table)
            .values(NewCrawlRun {
                chain_name: chain_name.to_string(),
                crawl_date,
                status: RunStatus::Started.to_string(),
            })
            .returning(CrawlRun::as_returning())
            .get_result(conn)
    }

    /// Transitions a run to a terminal status with its final counters.
    pub fn finish(
        conn: &mut PgConnection,
        id: Uuid,
        status: RunStatus,
        error: Option<String>,
        n_stores: i32,
        n_products: i32,
        n_prices: i32,
        elapsed: f64,
    ) -> DieselResult<CrawlRun> {
        diesel::update(crawl_runs::table.find(id))
            .set((
                crawl_runs::status.eq(status.to_string()),
                crawl_runs::error.eq(error),
                crawl_runs::n_stores.eq(n_stores),
                crawl_runs::n_products.eq(n_products),
                crawl_runs::n_prices.eq(n_prices),
                crawl_runs::elapsed.eq(elapsed),
            ))
            .returning(CrawlRun::as_returning())
            .get_result(conn)
    }

    pub fn latest_for_chain_and_date(
        conn: &mut PgConnection,
        chain_name: &str,
        crawl_date: NaiveDate,
    ) -> DieselResult<Option<CrawlRun>> {
        use diesel::OptionalExtension;
        crawl_runs::table
            .filter(crawl_runs::chain_name.eq(chain_name))
            .filter(crawl_runs::crawl_date.eq(crawl_date))
            .order(crawl_runs::timestamp.desc())
            .select(CrawlRun::as_select())
            .first(conn)
            .optional()
    }

    /// Backs `GET /v1/crawler/successful_runs/{date}` (spec.md §6).
    pub fn successful_runs(conn: &mut PgConnection, crawl_date: NaiveDate) -> DieselResult<Vec<CrawlRun>> {
        crawl_runs::table
            .filter(crawl_runs::crawl_date.eq(crawl_date))
            .filter(crawl_runs::status.eq(RunStatus::Success.to_string()))
            .order(crawl_runs::timestamp.desc())
            .select(CrawlRun::as_select())
            .load(conn)
    }

    /// Backs `GET /v1/crawler/failed_or_started_runs/{date}` (spec.md §6).
    pub fn failed_or_started_runs(conn: &mut PgConnection, crawl_date: NaiveDate) -> DieselResult<Vec<CrawlRun>> {
        crawl_runs::table
            .filter(crawl_runs::crawl_date.eq(crawl_date))
            .filter(
                crawl_runs::status
                    .eq(RunStatus::Failed.to_string())
                    .or(crawl_runs::status.eq(RunStatus::Started.to_string())),
            )
            .order(crawl_runs::timestamp.desc())
            .select(CrawlRun::as_select())
            .load(conn)
    }
}
