use chrono::{DateTime, NaiveDate, Utc};
use diesel::{
    BoolExpressionMethods, ExpressionMethods, Insertable, OptionalExtension, PgConnection,
    QueryDsl, Queryable, RunQueryDsl, Selectable, SelectableHelper,
};
use polica_common::RunStatus;
use serde::Serialize;
use serde_json::Value as Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::import_runs;

/// Audit row for one chain/date import attempt, unique on
/// `(chain_name, import_date)` so a chain can be imported at most once per
/// day (spec.md §4.D, §8 scenario 2 — re-running a `SUCCESS` import is a
/// `SKIPPED` no-op).
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = import_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImportRun {
    pub id: Uuid,
    pub crawl_run_id: Option<Uuid>,
    pub chain_name: String,
    pub import_date: NaiveDate,
    pub status: String,
    pub error: Option<String>,
    #[schema(value_type = Object)]
    pub counters: Json,
    pub elapsed: f64,
    pub timestamp: DateTime<Utc>,
    pub unzipped_path: Option<String>,
}

impl ImportRun {
    pub fn status(&self) -> RunStatus {
        self.status.parse().unwrap_or(RunStatus::Failed)
    }

    pub fn counters(&self) -> ImportCounters {
        serde_json::from_value(self.counters.clone()).unwrap_or_default()
    }
}

/// Row/entity counters tracked across one import run (spec.md §4.D).
#[derive(Debug, Clone, Default, Serialize, serde::Deserialize)]
pub struct ImportCounters {
    #[serde(default)]
    pub products_inserted: i64,
    #[serde(default)]
    pub chain_products_inserted: i64,
    #[serde(default)]
    pub prices_inserted: i64,
    #[serde(default)]
    pub stores_upserted: i64,
    #[serde(default)]
    pub rows_skipped_invalid: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = import_runs)]
pub struct NewImportRun {
    pub crawl_run_id: Option<Uuid>,
    pub chain_name: String,
    pub import_date: NaiveDate,
    pub status: String,
    pub counters: Json,
    pub unzipped_path: Option<String>,
}

impl ImportRun {
    /// Tries to claim the `(chain_name, import_date)` slot for a new import
    /// attempt. Returns `Ok(None)` when a row already exists for that key —
    /// callers treat this as "already imported" and record a `SKIPPED` run
    /// without touching the table (spec.md §8 scenario 2's idempotence law),
    /// rather than erroring on the unique-constraint violation.
    pub fn try_start(
        conn: &mut PgConnection,
        crawl_run_id: Option<Uuid>,
        chain_name: &str,
        import_date: NaiveDate,
        unzipped_path: Option<String>,
    ) -> DieselResult<Option<ImportRun>> {
        diesel::insert_into(import_runs::table)
            .values(NewImportRun {
                crawl_run_id,
                chain_name: chain_name.to_string(),
                import_date,
                status: RunStatus::Started.to_string(),
                counters: serde_json::to_value(ImportCounters::default()).unwrap(),
                unzipped_path,
            })
            .on_conflict((import_runs::chain_name, import_runs::import_date))
            .do_nothing()
            .returning(ImportRun::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn finish(
        conn: &mut PgConnection,
        id: Uuid,
        status: RunStatus,
        error: Option<String>,
        counters: ImportCounters,
        elapsed: f64,
    ) -> DieselResult<ImportRun> {
        diesel::update(import_runs::table.find(id))
            .set((
                import_runs::status.eq(status.to_string()),
                import_runs::error.eq(error),
                import_runs::counters.eq(serde_json::to_value(counters).unwrap()),
                import_runs::elapsed.eq(elapsed),
            ))
            .returning(ImportRun::as_returning())
            .get_result(conn)
    }

    pub fn get_by_chain_and_date(
        conn: &mut PgConnection,
        chain_name: &str,
        import_date: NaiveDate,
    ) -> DieselResult<Option<ImportRun>> {
        import_runs::table
            .filter(import_runs::chain_name.eq(chain_name))
            .filter(import_runs::import_date.eq(import_date))
            .select(ImportRun::as_select())
            .first(conn)
            .optional()
    }

    /// Resets a non-`SUCCESS` run back to `STARTED` for a retry. Only
    /// `SUCCESS` is a terminal skip per spec.md §4.D step 1 — a prior
    /// `FAILED` (timed out or erred) run must not block operators from
    /// re-invoking the import for that `(chain_name, import_date)`.
    pub fn restart(
        conn: &mut PgConnection,
        id: Uuid,
        crawl_run_id: Option<Uuid>,
        unzipped_path: Option<String>,
    ) -> DieselResult<ImportRun> {
        diesel::update(import_runs::table.find(id))
            .set((
                import_runs::status.eq(RunStatus::Started.to_string()),
                import_runs::error.eq(None::<String>),
                import_runs::counters.eq(serde_json::to_value(ImportCounters::default()).unwrap()),
                import_runs::crawl_run_id.eq(crawl_run_id),
                import_runs::unzipped_path.eq(unzipped_path),
            ))
            .returning(ImportRun::as_returning())
            .get_result(conn)
    }

    /// Backs the importer-status list endpoints analogous to the crawler's
    /// (spec.md §6: "`POST /v1/importer/status` ... and the two list variants").
    pub fn successful_runs(conn: &mut PgConnection, import_date: NaiveDate) -> DieselResult<Vec<ImportRun>> {
        import_runs::table
            .filter(import_runs::import_date.eq(import_date))
            .filter(import_runs::status.eq(RunStatus::Success.to_string()))
            .order(import_runs::timestamp.desc())
            .select(ImportRun::as_select())
            .load(conn)
    }

    pub fn failed_or_started_runs(conn: &mut PgConnection, import_date: NaiveDate) -> DieselResult<Vec<ImportRun>> {
        import_runs::table
            .filter(import_runs::import_date.eq(import_date))
            .filter(
                import_runs::status
                    .eq(RunStatus::Failed.to_string())
                    .or(import_runs::status.eq(RunStatus::Started.to_string())),
            )
            .order(import_runs::timestamp.desc())
            .select(ImportRun::as_select())
            .load(conn)
    }
}
