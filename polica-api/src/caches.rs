use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use polica_entities::{GoldenProductDto, StoreWithDistanceDto};

use crate::constants::caches::{
    GOLDEN_PRODUCT_CACHE_TIME_TO_IDLE_IN_SECONDS, GOLDEN_PRODUCT_CACHE_TIME_TO_LIVE_IN_SECONDS,
    NEARBY_STORES_CACHE_TIME_TO_IDLE_IN_SECONDS, NEARBY_STORES_CACHE_TIME_TO_LIVE_IN_SECONDS,
};

/// Structure responsible of holding our Databases caches.
/// All the caches are initialized empty with their associated time to live in the
/// constants module.
#[derive(Clone, Debug)]
pub struct CacheRegistry {
    golden_products: Cache<Uuid, GoldenProductDto>,
    nearby_stores: Cache<String, Vec<StoreWithDistanceDto>>,
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheRegistry {
    /// Initialize all of our caches empty.
    pub fn new() -> Self {
        let golden_products = Cache::builder()
            .time_to_live(Duration::from_secs(
                GOLDEN_PRODUCT_CACHE_TIME_TO_LIVE_IN_SECONDS,
            ))
            .time_to_idle(Duration::from_secs(
                GOLDEN_PRODUCT_CACHE_TIME_TO_IDLE_IN_SECONDS,
            ))
            .build();

        let nearby_stores = Cache::builder()
            .time_to_live(Duration::from_secs(
                NEARBY_STORES_CACHE_TIME_TO_LIVE_IN_SECONDS,
            ))
            .time_to_idle(Duration::from_secs(
                NEARBY_STORES_CACHE_TIME_TO_IDLE_IN_SECONDS,
            ))
            .build();

        Self {
            golden_products,
            nearby_stores,
        }
    }

    pub const fn golden_products(&self) -> &Cache<Uuid, GoldenProductDto> {
        &self.golden_products
    }

    pub const fn nearby_stores(&self) -> &Cache<String, Vec<StoreWithDistanceDto>> {
        &self.nearby_stores
    }
}
