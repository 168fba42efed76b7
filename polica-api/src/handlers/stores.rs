//! `GET /v2/stores/nearby` (spec.md §6, backing `find_nearby_stores_v2`).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use polica_entities::StoreWithDistanceDto;

use crate::errors::AppError;
use crate::infra::repositories::store;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyStoresParams {
    pub lat: f64,
    pub lon: f64,
    pub radius_meters: f64,
    pub chain_code: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v2/stores/nearby",
    params(NearbyStoresParams),
    responses((status = 200, description = "Stores within the radius, closest first", body = [StoreWithDistanceDto]))
)]
pub async fn nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyStoresParams>,
) -> Result<Json<Vec<StoreWithDistanceDto>>, AppError> {
    let rows = store::find_nearby(&state.pool, params.lat, params.lon, params.radius_meters, params.chain_code).await?;
    Ok(Json(rows.into_iter().map(StoreWithDistanceDto::from).collect()))
}
