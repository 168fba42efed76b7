use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::{ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable, SelectableHelper};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::prices;

/// PK is the natural key `(chain_product_id, store_id, price_date)`
/// (spec.md §3); inserting twice with identical inputs is idempotent.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Price {
    pub chain_product_id: Uuid,
    pub store_id: Uuid,
    pub price_date: NaiveDate,
    pub regular_price: Option<BigDecimal>,
    pub special_price: Option<BigDecimal>,
    pub unit_price: Option<BigDecimal>,
    pub best_price_30: Option<BigDecimal>,
    pub anchor_price: Option<BigDecimal>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prices)]
pub struct NewPrice {
    pub chain_product_id: Uuid,
    pub store_id: Uuid,
    pub price_date: NaiveDate,
    pub regular_price: Option<BigDecimal>,
    pub special_price: Option<BigDecimal>,
    pub unit_price: Option<BigDecimal>,
    pub best_price_30: Option<BigDecimal>,
    pub anchor_price: Option<BigDecimal>,
}

impl Price {
    /// Bulk-inserts with `ON CONFLICT DO NOTHING` on the natural PK so a
    /// re-import of the same CSV yields zero new rows (spec.md §4.D step 6,
    /// §8 idempotence law). Returns the number of rows actually inserted.
    pub fn insert_many_ignore_conflicts(
        conn: &mut PgConnection,
        batch: Vec<NewPrice>,
    ) -> DieselResult<usize> {
        diesel::insert_into(prices::table)
            .values(batch)
            .on_conflict((prices::chain_product_id, prices::store_id, prices::price_date))
            .do_nothing()
            .execute(conn)
    }

    pub fn count_for_date(conn: &mut PgConnection, date: NaiveDate) -> DieselResult<i64> {
        use diesel::dsl::count_star;
        prices::table
            .filter(prices::price_date.eq(date))
            .select(count_star())
            .get_result(conn)
    }

    /// Every price row ever recorded for a set of `ChainProduct`s, used by
    /// the unit-price/best-offer updater to fold each `(store_id,
    /// price_date)` observation into the owning golden product (spec.md
    /// §4.G). Unbounded by design: the golden-record pipeline is an offline
    /// batch job, not a request-path query.
    pub fn for_chain_product_ids(conn: &mut PgConnection, chain_product_ids: &[Uuid]) -> DieselResult<Vec<Price>> {
        prices::table
            .filter(prices::chain_product_id.eq_any(chain_product_ids))
            .select(Price::as_select())
            .load(conn)
    }

    pub fn for_chain_product_and_date(
        conn: &mut PgConnection,
        chain_product_id: Uuid,
        date: NaiveDate,
    ) -> DieselResult<Vec<Price>> {
        prices::table
            .filter(prices::chain_product_id.eq(chain_product_id))
            .filter(prices::price_date.eq(date))
            .select(Price::as_select())
            .load(conn)
    }
}
