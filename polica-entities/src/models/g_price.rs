use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::g_prices;

/// Per-store, per-day price against a golden product (spec.md §3).
/// Invariant: `regular_price IS NOT NULL OR special_price IS NOT NULL`
/// (spec.md §8) — enforced by callers before constructing `NewGPrice`.
#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable)]
#[diesel(table_name = g_prices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GPrice {
    pub product_id: Uuid,
    pub store_id: Uuid,
    pub price_date: NaiveDate,
    pub regular_price: Option<BigDecimal>,
    pub special_price: Option<BigDecimal>,
    pub price_per_kg: Option<BigDecimal>,
    pub price_per_l: Option<BigDecimal>,
    pub price_per_piece: Option<BigDecimal>,
    pub is_on_special_offer: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = g_prices)]
pub struct NewGPrice {
    pub product_id: Uuid,
    pub store_id: Uuid,
    pub price_date: NaiveDate,
    pub regular_price: Option<BigDecimal>,
    pub special_price: Option<BigDecimal>,
    pub price_per_kg: Option<BigDecimal>,
    pub price_per_l: Option<BigDecimal>,
    pub price_per_piece: Option<BigDecimal>,
    pub is_on_special_offer: bool,
}

impl GPrice {
    /// Upserts on `(product_id, store_id, price_date)`, recomputing the
    /// `price_per_*` trio and `is_on_special_offer` each time (spec.md
    /// §4.G).
    pub fn upsert(conn: &mut PgConnection, new: NewGPrice) -> DieselResult<GPrice> {
        diesel::insert_into(g_prices::table)
            .values(&new)
            .on_conflict((g_prices::product_id, g_prices::store_id, g_prices::price_date))
            .do_update()
            .set((
                g_prices::regular_price.eq(&new.regular_price),
                g_prices::special_price.eq(&new.special_price),
                g_prices::price_per_kg.eq(&new.price_per_kg),
                g_prices::price_per_l.eq(&new.price_per_l),
                g_prices::price_per_piece.eq(&new.price_per_piece),
                g_prices::is_on_special_offer.eq(new.is_on_special_offer),
            ))
            .returning(GPrice::as_returning())
            .get_result(conn)
    }

    pub fn for_product(conn: &mut PgConnection, product_id: Uuid) -> DieselResult<Vec<GPrice>> {
        g_prices::table
            .filter(g_prices::product_id.eq(product_id))
            .select(GPrice::as_select())
            .load(conn)
    }

    /// Lowest-first prices for a product restricted to a set of stores,
    /// backing `get_product_prices_by_location_v2` (spec.md §4.H).
    pub fn lowest_first_for_stores(
        conn: &mut PgConnection,
        product_id: Uuid,
        store_ids: &[Uuid],
    ) -> DieselResult<Vec<GPrice>> {
        use diesel::dsl::sql;
        use diesel::sql_types::Nullable;

        g_prices::table
            .filter(g_prices::product_id.eq(product_id))
            .filter(g_prices::store_id.eq_any(store_ids))
            .order(sql::<Nullable<diesel::sql_types::Numeric>>(
                "COALESCE(special_price, regular_price) ASC",
            ))
            .select(GPrice::as_select())
            .load(conn)
    }
}
