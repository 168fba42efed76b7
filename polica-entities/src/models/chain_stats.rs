use chrono::NaiveDate;
use diesel::sql_types::Date;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::chain_stats;

/// Derived per-`(chain_id, price_date)` counters (spec.md §3).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = chain_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChainStats {
    pub chain_id: Uuid,
    pub price_date: NaiveDate,
    pub price_count: i64,
    pub store_count: i64,
}

impl ChainStats {
    /// Recomputes `COUNT(*)` and `COUNT(DISTINCT store_id)` per chain for
    /// `date` (spec.md §4.D `compute_chain_stats`).
    pub fn recompute_for_date(conn: &mut PgConnection, date: NaiveDate) -> DieselResult<usize> {
        diesel::sql_query(
            r"
            INSERT INTO chain_stats (chain_id, price_date, price_count, store_count)
            SELECT
                cp.chain_id,
                p.price_date,
                COUNT(*) AS price_count,
                COUNT(DISTINCT p.store_id) AS store_count
            FROM prices p
            JOIN chain_products cp ON cp.id = p.chain_product_id
            WHERE p.price_date = $1
            GROUP BY cp.chain_id, p.price_date
            ON CONFLICT (chain_id, price_date)
            DO UPDATE SET
                price_count = excluded.price_count,
                store_count = excluded.store_count
            ",
        )
        .bind::<Date, _>(date)
        .execute(conn)
    }

    pub fn for_chain(conn: &mut PgConnection, chain_id: Uuid, date: NaiveDate) -> DieselResult<ChainStats> {
        chain_stats::table
            .filter(chain_stats::chain_id.eq(chain_id))
            .filter(chain_stats::price_date.eq(date))
            .select(ChainStats::as_select())
            .get_result(conn)
    }
}
