use deadpool_diesel::postgres::Pool;
use uuid::Uuid;

use polica_common::BaseUnitType;
use polica_entities::{adapt_infra_error, GPrice, GProduct, GProductBestOffer, InfraError};

/// Tool-relevant sort orders for `search_products_v2` (spec.md §4.H).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Relevance,
    BestValueKg,
    BestValueL,
    BestValuePiece,
}

impl SortBy {
    fn value_metric(self) -> Option<BaseUnitType> {
        match self {
            Self::Relevance => None,
            Self::BestValueKg => Some(BaseUnitType::Weight),
            Self::BestValueL => Some(BaseUnitType::Volume),
            Self::BestValuePiece => Some(BaseUnitType::Count),
        }
    }
}

/// Backs the `search_products_v2` chat tool and `GET /v2/products/search`.
/// A plain `relevance` sort is the lexical substring match; any
/// `best_value_*` sort filters to the matching `base_unit_type` and orders
/// by the cheapest unit price across `store_ids` (spec.md §8 scenario 6).
#[allow(clippy::too_many_arguments)]
pub async fn search(
    pool: &Pool,
    query: String,
    store_ids: Option<Vec<Uuid>>,
    sort_by: SortBy,
    category: Option<String>,
    brand: Option<String>,
    limit: i64,
    offset: i64,
) -> Result<Vec<GProduct>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| match sort_by.value_metric() {
        Some(metric) => GProduct::search_by_value_metric(
            conn,
            metric,
            Some(query.as_str()).filter(|q| !q.is_empty()),
            store_ids.as_deref(),
            category.as_deref(),
            brand.as_deref(),
            limit,
            offset,
        ),
        None => GProduct::search_by_text(conn, &query, category.as_deref(), brand.as_deref(), limit, offset),
    })
    .await
    .map_err(adapt_infra_error)?
    .map_err(adapt_infra_error)
}

pub async fn get(pool: &Pool, id: Uuid) -> Result<GProduct, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| GProduct::get(conn, id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

pub async fn best_offer(pool: &Pool, product_id: Uuid) -> Result<Option<GProductBestOffer>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| GProductBestOffer::get(conn, product_id))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}

/// Backs `get_product_prices_by_location_v2` and
/// `GET /v2/products/{id}/prices-by-location`.
pub async fn prices_by_location(
    pool: &Pool,
    product_id: Uuid,
    store_ids: Vec<Uuid>,
) -> Result<Vec<GPrice>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| GPrice::lowest_first_for_stores(conn, product_id, &store_ids))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
