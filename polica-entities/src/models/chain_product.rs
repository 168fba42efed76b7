use diesel::{
    BoolExpressionMethods, ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable,
    RunQueryDsl, Selectable, SelectableHelper,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::chain_products;

/// A chain-specific shape of a `Product`: its local code/name/brand
/// (spec.md's "chain product" glossary entry). Unique on `(chain_id, code)`.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = chain_products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChainProduct {
    pub id: Uuid,
    pub chain_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<String>,
    pub is_processed: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chain_products)]
pub struct NewChainProduct {
    pub chain_id: Uuid,
    pub product_id: Uuid,
    pub code: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<String>,
}

impl ChainProduct {
    /// Bulk-inserts, ignoring rows whose `(chain_id, code)` already exist
    /// (spec.md §4.D step 5).
    pub fn insert_many_ignore_conflicts(
        conn: &mut PgConnection,
        batch: Vec<NewChainProduct>,
    ) -> DieselResult<usize> {
        diesel::insert_into(chain_products::table)
            .values(batch)
            .on_conflict((chain_products::chain_id, chain_products::code))
            .do_nothing()
            .execute(conn)
    }

    pub fn get_by_chain_and_code(
        conn: &mut PgConnection,
        chain_id: Uuid,
        code: &str,
    ) -> DieselResult<ChainProduct> {
        chain_products::table
            .filter(
                chain_products::chain_id
                    .eq(chain_id)
                    .and(chain_products::code.eq(code)),
            )
            .select(ChainProduct::as_select())
            .get_result(conn)
    }

    /// All `ChainProduct`s sharing a `Product`, used by the normalizer to
    /// aggregate name/brand/category/unit variants per EAN (spec.md §4.F).
    pub fn by_product_ids(
        conn: &mut PgConnection,
        product_ids: &[Uuid],
    ) -> DieselResult<Vec<ChainProduct>> {
        chain_products::table
            .filter(chain_products::product_id.eq_any(product_ids))
            .select(ChainProduct::as_select())
            .load(conn)
    }

    /// Marks a batch of chain products as processed in one update
    /// (spec.md §4.F step 6).
    pub fn mark_processed(conn: &mut PgConnection, ids: &[Uuid]) -> DieselResult<usize> {
        diesel::update(chain_products::table.filter(chain_products::id.eq_any(ids)))
            .set(chain_products::is_processed.eq(true))
            .execute(conn)
    }

    /// `product_id`s that have at least one unprocessed `ChainProduct`
    /// within `[start_id, start_id + batch_size)`, driving the golden-record
    /// orchestrator's batch partitioning (spec.md §4.E).
    pub fn unprocessed_product_ids_in_range(
        conn: &mut PgConnection,
        start_id: Uuid,
        limit: i64,
    ) -> DieselResult<Vec<Uuid>> {
        chain_products::table
            .filter(chain_products::is_processed.eq(false))
            .filter(chain_products::id.ge(start_id))
            .select(chain_products::product_id)
            .distinct()
            .order(chain_products::product_id.asc())
            .limit(limit)
            .load(conn)
    }
}
