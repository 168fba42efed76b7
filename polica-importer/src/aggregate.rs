//! Post-import materialization (spec.md §4.D step 7): recomputes the
//! derived `ChainPrice`/`ChainStats` aggregates for a date. Callers hold
//! `RECOMPUTE_LOCK` for the duration so concurrent per-chain imports don't
//! race each other rewriting the same aggregate rows.

use chrono::NaiveDate;
use deadpool_diesel::postgres::Pool;
use polica_entities::{ChainPrice, ChainStats, InfraError};

pub(crate) async fn recompute_aggregates_for_date(pool: &Pool, date: NaiveDate) -> Result<(), InfraError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    conn.interact(move |conn| -> Result<(), diesel::result::Error> {
        ChainPrice::recompute_for_date(conn, date)?;
        ChainStats::recompute_for_date(conn, date)?;
        Ok(())
    })
    .await
    .map_err(InfraError::from)?
    .map_err(InfraError::from)
}
