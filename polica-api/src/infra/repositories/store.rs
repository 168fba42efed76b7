use deadpool_diesel::postgres::Pool;

use polica_entities::{adapt_infra_error, InfraError, Store};

/// Backs `find_nearby_stores_v2` and `GET /v2/stores/nearby` (spec.md §4.H).
pub async fn find_nearby(
    pool: &Pool,
    lat: f64,
    lon: f64,
    radius_meters: f64,
    chain_code: Option<String>,
) -> Result<Vec<(Store, f64)>, InfraError> {
    let conn = pool.get().await.map_err(adapt_infra_error)?;
    conn.interact(move |conn| Store::find_nearby(conn, lat, lon, radius_meters, chain_code.as_deref()))
        .await
        .map_err(adapt_infra_error)?
        .map_err(adapt_infra_error)
}
