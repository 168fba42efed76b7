use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::store::Store;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreDto {
    pub id: Uuid,
    pub chain_id: Uuid,
    pub code: String,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phone: Option<String>,
}

impl From<Store> for StoreDto {
    fn from(s: Store) -> Self {
        Self {
            id: s.id,
            chain_id: s.chain_id,
            code: s.code,
            type_: s.type_,
            address: s.address,
            city: s.city,
            zipcode: s.zipcode,
            lat: s.lat,
            lon: s.lon,
            phone: s.phone,
        }
    }
}

/// A `StoreDto` annotated with its distance from the query point, returned
/// by `find_nearby_stores_v2` (spec.md §4.H).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreWithDistanceDto {
    #[serde(flatten)]
    pub store: StoreDto,
    pub distance_meters: f64,
}

impl From<(Store, f64)> for StoreWithDistanceDto {
    fn from((store, distance_meters): (Store, f64)) -> Self {
        Self {
            store: store.into(),
            distance_meters,
        }
    }
}
