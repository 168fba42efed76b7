use chrono::{DateTime, Utc};
use diesel::{
    ExpressionMethods, Insertable, PgConnection, QueryDsl, Queryable, RunQueryDsl, Selectable,
    SelectableHelper,
};
use polica_common::{BaseUnitType, Variant};
use serde::Serialize;
use serde_json::Value as Json;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::g_products;

/// The canonical de-duplicated product record keyed by EAN (spec.md's
/// "golden record" glossary entry). `variants`/`keywords`/`embedding` are
/// stored as `jsonb` and decoded on demand — the embedding in particular
/// is kept "opaque" per spec.md §9 (no in-process vector math beyond
/// equality/round-trip).
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = g_products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GProduct {
    pub id: Uuid,
    pub ean: String,
    pub canonical_name: String,
    pub brand: Option<String>,
    pub category: String,
    pub base_unit_type: String,
    pub variants: Json,
    pub text_for_embedding: String,
    pub keywords: Json,
    pub is_generic_product: bool,
    pub seasonal_start_month: Option<i16>,
    pub seasonal_end_month: Option<i16>,
    pub embedding: Json,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = g_products)]
pub struct NewGProduct {
    pub ean: String,
    pub canonical_name: String,
    pub brand: Option<String>,
    pub category: String,
    pub base_unit_type: String,
    pub variants: Json,
    pub text_for_embedding: String,
    pub keywords: Json,
    pub is_generic_product: bool,
    pub seasonal_start_month: Option<i16>,
    pub seasonal_end_month: Option<i16>,
    pub embedding: Json,
}

impl GProduct {
    /// Parsed `base_unit_type`; falls back to `Count` only if the stored
    /// value is somehow malformed (it never should be — §4.F validates the
    /// LLM response against this enum before insertion).
    pub fn base_unit_type(&self) -> BaseUnitType {
        self.base_unit_type.parse().unwrap_or(BaseUnitType::Count)
    }

    pub fn variants(&self) -> Vec<Variant> {
        serde_json::from_value(self.variants.clone()).unwrap_or_default()
    }

    pub fn keywords(&self) -> Vec<String> {
        serde_json::from_value(self.keywords.clone()).unwrap_or_default()
    }

    pub fn embedding(&self) -> Vec<f32> {
        serde_json::from_value(self.embedding.clone()).unwrap_or_default()
    }

    /// Inserts the golden record, treating a conflict on `ean` as "already
    /// exists" (spec.md §4.F step 5): returns `Ok(None)` rather than erroring.
    pub fn insert_if_absent(conn: &mut PgConnection, new: NewGProduct) -> DieselResult<Option<GProduct>> {
        diesel::insert_into(g_products::table)
            .values(new)
            .on_conflict(g_products::ean)
            .do_nothing()
            .returning(GProduct::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn get_by_ean(conn: &mut PgConnection, ean: &str) -> DieselResult<GProduct> {
        g_products::table
            .filter(g_products::ean.eq(ean))
            .select(GProduct::as_select())
            .get_result(conn)
    }

    pub fn get(conn: &mut PgConnection, id: Uuid) -> DieselResult<GProduct> {
        g_products::table
            .find(id)
            .select(GProduct::as_select())
            .get_result(conn)
    }

    pub fn exists_for_ean(conn: &mut PgConnection, ean: &str) -> DieselResult<bool> {
        diesel::select(diesel::dsl::exists(
            g_products::table.filter(g_products::ean.eq(ean)),
        ))
        .get_result(conn)
    }

    /// Every golden record's `(ean, id, base_unit_type, variants)`, used by
    /// `polica-crawler` to build the archive writer's EAN→golden lookup
    /// before crawling a batch of chains (spec.md §4.C step 1).
    pub fn all_for_archive_lookup(
        conn: &mut PgConnection,
    ) -> DieselResult<Vec<(String, Uuid, String, Json)>> {
        g_products::table
            .select((g_products::ean, g_products::id, g_products::base_unit_type, g_products::variants))
            .load(conn)
    }

    pub fn list_in_range(conn: &mut PgConnection, start_id: Uuid, limit: i64) -> DieselResult<Vec<GProduct>> {
        g_products::table
            .filter(g_products::id.ge(start_id))
            .order(g_products::id.asc())
            .limit(limit)
            .select(GProduct::as_select())
            .load(conn)
    }

    /// Plain lexical substring match over name/brand/category, optionally
    /// narrowed to an exact `category`/`brand` (same exact-match semantics
    /// as `search_by_value_metric`'s `$4`/`$5` filters, so `relevance` and
    /// `best_value_*` sorts agree on what "filtered by category/brand"
    /// means). The hybrid lexical+vector ranking required by
    /// `search_products_v2` (spec.md §4.H) is composed on top of this in
    /// `polica-api`'s repository layer.
    #[allow(clippy::too_many_arguments)]
    pub fn search_by_text(
        conn: &mut PgConnection,
        query: &str,
        category: Option<&str>,
        brand: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DieselResult<Vec<GProduct>> {
        use diesel::{BoolExpressionMethods, PgTextExpressionMethods};
        let pattern = format!("%{query}%");
        let mut stmt = g_products::table
            .into_boxed()
            .filter(
                g_products::canonical_name
                    .ilike(pattern.clone())
                    .or(g_products::brand.ilike(pattern.clone()))
                    .or(g_products::category.ilike(pattern)),
            );
        if let Some(category) = category {
            stmt = stmt.filter(g_products::category.eq(category.to_string()));
        }
        if let Some(brand) = brand {
            stmt = stmt.filter(g_products::brand.eq(brand.to_string()));
        }
        stmt.order(g_products::canonical_name.asc())
            .limit(limit)
            .offset(offset)
            .select(GProduct::as_select())
            .load(conn)
    }

    /// Lexical search ordered by the cheapest observed unit price across a
    /// (optionally store-restricted) set of `g_prices` rows, backing the
    /// `sort_by=best_value_{kg,l,piece}` branch of `search_products_v2`
    /// (spec.md §4.H, §8 scenario 6). Only products whose `base_unit_type`
    /// matches `metric` are eligible, since a price-per-litre comparison is
    /// meaningless for a product sold by weight.
    #[allow(clippy::too_many_arguments)]
    pub fn search_by_value_metric(
        conn: &mut PgConnection,
        metric: BaseUnitType,
        query: Option<&str>,
        store_ids: Option<&[Uuid]>,
        category: Option<&str>,
        brand: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DieselResult<Vec<GProduct>> {
        use diesel::sql_types::{Array, BigInt, Nullable, Text};

        #[derive(diesel::QueryableByName)]
        struct IdRow {
            #[diesel(sql_type = diesel::sql_types::Uuid)]
            id: Uuid,
        }

        let price_column = match metric {
            BaseUnitType::Weight => "price_per_kg",
            BaseUnitType::Volume => "price_per_l",
            BaseUnitType::Count => "price_per_piece",
        };

        let sql = format!(
            r#"
            SELECT gp.id FROM g_products gp
            JOIN g_prices pr ON pr.product_id = gp.id
            WHERE gp.base_unit_type = $1
              AND pr.{price_column} IS NOT NULL
              AND ($2::uuid[] IS NULL OR pr.store_id = ANY($2))
              AND ($3::varchar IS NULL
                   OR gp.canonical_name ILIKE $3
                   OR gp.brand ILIKE $3
                   OR gp.category ILIKE $3)
              AND ($4::varchar IS NULL OR gp.category = $4)
              AND ($5::varchar IS NULL OR gp.brand = $5)
            GROUP BY gp.id
            ORDER BY MIN(pr.{price_column}) ASC, gp.canonical_name ASC
            LIMIT $6 OFFSET $7
            "#
        );

        let pattern = query.map(|q| format!("%{q}%"));
        let rows: Vec<IdRow> = diesel::sql_query(sql)
            .bind::<Text, _>(metric.to_string())
            .bind::<Nullable<Array<diesel::sql_types::Uuid>>, _>(store_ids.map(|ids| ids.to_vec()))
            .bind::<Nullable<Text>, _>(pattern)
            .bind::<Nullable<Text>, _>(category)
            .bind::<Nullable<Text>, _>(brand)
            .bind::<BigInt, _>(limit)
            .bind::<BigInt, _>(offset)
            .load(conn)?;

        let ordered_ids: Vec<Uuid> = rows.into_iter().map(|r| r.id).collect();
        if ordered_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut products: std::collections::HashMap<Uuid, GProduct> = g_products::table
            .filter(g_products::id.eq_any(&ordered_ids))
            .select(GProduct::as_select())
            .load(conn)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ordered_ids
            .into_iter()
            .filter_map(|id| products.remove(&id))
            .collect())
    }
}
