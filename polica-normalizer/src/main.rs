mod aggregate;
mod best_offer;
mod config;
mod error;
mod orchestrator;
mod provider;
mod worker;

use std::sync::Arc;

use dotenvy::dotenv;
use polica_entities::connection::init_pool;
use polica_entities::{ChainProduct, GProduct, InfraError};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::{load_configuration, Command};
use crate::provider::{EmbeddingProvider, NormalizerProvider, OpenAiProvider};

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = load_configuration();
    polica_common::telemetry::init_telemetry("polica-normalizer".into(), args.otel_endpoint.clone())?;

    let pool = init_pool("polica-normalizer")?;

    match args.command {
        Some(Command::Normalize { start_id, batch_size, chat_model, embedding_model }) => {
            run_normalize_batch(&pool, start_id, batch_size, &chat_model, &embedding_model).await?;
        }
        Some(Command::BestOffer { start_id, batch_size }) => {
            run_best_offer_batch(&pool, start_id, batch_size).await?;
        }
        None => {
            orchestrator::run_normalize_pass(
                &pool,
                args.worker_count,
                args.batch_size,
                &args.chat_model,
                &args.embedding_model,
            )
            .await?;
            orchestrator::run_best_offer_pass(&pool, args.worker_count, args.batch_size).await?;
        }
    }

    Ok(())
}

/// One worker-process invocation of spec.md §4.F: every product in
/// `[start_id, start_id + batch_size)` that still has an unprocessed chain
/// product. Each EAN is independent — a failure is logged and the worker
/// moves to the next one (spec.md §4.F step 7).
async fn run_normalize_batch(
    pool: &deadpool_diesel::postgres::Pool,
    start_id: Uuid,
    batch_size: i64,
    chat_model: &str,
    embedding_model: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer: Arc<dyn NormalizerProvider> =
        Arc::new(OpenAiProvider::new(chat_model.to_string(), embedding_model.to_string()));
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(OpenAiProvider::new(chat_model.to_string(), embedding_model.to_string()));

    let product_ids = {
        let conn = pool.get().await.map_err(InfraError::from)?;
        conn.interact(move |conn| ChainProduct::unprocessed_product_ids_in_range(conn, start_id, batch_size))
            .await
            .map_err(InfraError::from)??
    };

    info!(count = product_ids.len(), %start_id, batch_size, "normalize batch: claimed products");

    let mut processed = 0usize;
    for product_id in product_ids {
        match worker::process_one_product(pool, &normalizer, &embedder, product_id).await {
            Ok(n) => processed += n,
            Err(e) => error!(%product_id, error = %e, "normalize: product failed, will retry on next sweep"),
        }
    }

    info!(processed, "normalize batch complete");
    Ok(())
}

/// One worker-process invocation of spec.md §4.G over
/// `[start_id, start_id + batch_size)` golden products.
async fn run_best_offer_batch(
    pool: &deadpool_diesel::postgres::Pool,
    start_id: Uuid,
    batch_size: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let g_products = {
        let conn = pool.get().await.map_err(InfraError::from)?;
        conn.interact(move |conn| GProduct::list_in_range(conn, start_id, batch_size))
            .await
            .map_err(InfraError::from)??
    };

    info!(count = g_products.len(), %start_id, batch_size, "best-offer batch: claimed golden products");

    let mut written = 0usize;
    for g_product in g_products {
        match best_offer::process_one_g_product(pool, g_product.id).await {
            Ok(n) => written += n,
            Err(e) => error!(product_id = %g_product.id, error = %e, "best-offer: product failed, will retry on next sweep"),
        }
    }

    info!(written, "best-offer batch complete");
    Ok(())
}
