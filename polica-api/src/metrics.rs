use prometheus::{Error as PrometheusError, Registry};
use std::sync::Arc;

/// Holds the process-wide Prometheus `Registry` exposed at `/v1/metrics`
/// (spec.md §4.I's ambient observability stack).
#[derive(Clone, Debug)]
pub struct MetricsRegistry(Arc<Registry>);

impl MetricsRegistry {
    pub fn new() -> Self {
        MetricsRegistry(Arc::new(Registry::new()))
    }

    pub fn register<T: Clone + prometheus::core::Collector + 'static>(
        &self,
        metric: T,
    ) -> Result<T, PrometheusError> {
        self.0.register(Box::new(metric.clone()))?;
        Ok(metric)
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.0.clone()
    }
}
