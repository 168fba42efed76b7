mod auth;
mod caches;
mod chat;
mod config;
mod constants;
mod errors;
mod handlers;
mod infra;
mod metrics;
mod server;
mod state;

use std::sync::Arc;

use dotenvy::dotenv;

use caches::CacheRegistry;
use metrics::MetricsRegistry;
use state::AppState;

use crate::config::config;

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    polica_common::telemetry::init_telemetry("polica-api".into(), otel_endpoint)?;

    let config = config().await;

    let pool = polica_entities::connection::init_pool("polica-api").expect("can't init database pool");
    polica_entities::db::run_migrations(&pool).await;

    let state = AppState {
        pool,
        caches: Arc::new(CacheRegistry::new()),
        metrics: Arc::new(MetricsRegistry::new()),
        jwt: Arc::new(config.jwt().clone()),
    };

    server::run_api_server(config, state).await;

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}
