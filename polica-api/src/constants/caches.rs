// See:
// <https://docs.rs/moka/latest/moka/future/struct.Cache.html#example-time-based-expirations>

/// Golden products change slowly (only via the normalizer worker) so a
/// generous TTL is safe; TTI evicts entries nobody has asked about recently.
pub const GOLDEN_PRODUCT_CACHE_TIME_TO_LIVE_IN_SECONDS: u64 = 30 * 60; // 30 minutes
pub const GOLDEN_PRODUCT_CACHE_TIME_TO_IDLE_IN_SECONDS: u64 = 10 * 60; // 10 minutes

/// Nearby-stores lookups are keyed on a rounded `(lat, lon, radius, chain)`
/// tuple — short-lived since a user's location can change between requests.
pub const NEARBY_STORES_CACHE_TIME_TO_LIVE_IN_SECONDS: u64 = 5 * 60; // 5 minutes
pub const NEARBY_STORES_CACHE_TIME_TO_IDLE_IN_SECONDS: u64 = 2 * 60; // 2 minutes
