use std::sync::Arc;

use deadpool_diesel::postgres::Pool;

use crate::caches::CacheRegistry;
use crate::config::settings::JwtConfig;
use crate::metrics::MetricsRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub caches: Arc<CacheRegistry>,
    pub metrics: Arc<MetricsRegistry>,
    pub jwt: Arc<JwtConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("caches", &self.caches)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
