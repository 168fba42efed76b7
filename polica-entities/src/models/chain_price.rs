use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::sql_types::Date;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::chain_prices;

/// Derived per-`(chain_product_id, price_date)` aggregate (spec.md §3).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = chain_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChainPrice {
    pub chain_product_id: Uuid,
    pub price_date: NaiveDate,
    pub min_price: BigDecimal,
    pub max_price: BigDecimal,
    pub avg_price: BigDecimal,
}

impl ChainPrice {
    /// Recomputes and upserts `ChainPrice` for every `chain_product_id` that
    /// has a `Price` row on `date` (spec.md §4.D `compute_chain_prices`).
    /// The `LEAST(COALESCE(regular, special), COALESCE(special, regular))`
    /// expression picks whichever of the two non-null prices is lower,
    /// falling back to the only one present.
    pub fn recompute_for_date(conn: &mut PgConnection, date: NaiveDate) -> DieselResult<usize> {
        diesel::sql_query(
            r"
            INSERT INTO chain_prices (chain_product_id, price_date, min_price, max_price, avg_price)
            SELECT
                chain_product_id,
                price_date,
                MIN(LEAST(COALESCE(regular_price, special_price), COALESCE(special_price, regular_price))) AS min_price,
                MAX(LEAST(COALESCE(regular_price, special_price), COALESCE(special_price, regular_price))) AS max_price,
                AVG(LEAST(COALESCE(regular_price, special_price), COALESCE(special_price, regular_price))) AS avg_price
            FROM prices
            WHERE price_date = $1
              AND (regular_price IS NOT NULL OR special_price IS NOT NULL)
            GROUP BY chain_product_id, price_date
            ON CONFLICT (chain_product_id, price_date)
            DO UPDATE SET
                min_price = excluded.min_price,
                max_price = excluded.max_price,
                avg_price = excluded.avg_price
            ",
        )
        .bind::<Date, _>(date)
        .execute(conn)
    }

    pub fn for_chain_product(
        conn: &mut PgConnection,
        chain_product_id: Uuid,
        date: NaiveDate,
    ) -> DieselResult<ChainPrice> {
        chain_prices::table
            .filter(chain_prices::chain_product_id.eq(chain_product_id))
            .filter(chain_prices::price_date.eq(date))
            .select(ChainPrice::as_select())
            .get_result(conn)
    }
}
