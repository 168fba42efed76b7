mod config;
mod registry;

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use deadpool_diesel::postgres::Pool;
use dotenvy::dotenv;
use polica_adapters::archive::{write_chain_archive, GoldenLookup};
use polica_adapters::{AdapterError, AdapterStore, ChainAdapter};
use polica_common::RunStatus;
use polica_entities::{connection::init_pool, CrawlRun, GProduct, InfraError};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::config::load_configuration;

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = load_configuration();
    polica_common::telemetry::init_telemetry("polica-crawler".into(), args.otel_endpoint.clone())?;

    let pool = init_pool("polica-crawler")?;
    let crawl_date = args.crawl_date.unwrap_or_else(|| Utc::now().date_naive());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.http_timeout_secs))
        .build()?;

    let g_products_map = load_g_products_map(&pool).await?;

    let adapters = registry::all_adapters(client);
    let wanted: Option<std::collections::HashSet<String>> =
        args.chains.map(|cs| cs.into_iter().collect());

    let date_dir = args.root.join(crawl_date.to_string());
    std::fs::create_dir_all(&date_dir)?;

    let mut archive_paths = Vec::new();

    // Sequential by design (spec.md §4.C): scraping one chain is usually
    // IO-bound on one host, and a failure in one chain must not mask or
    // interleave with another's status reporting.
    for adapter in adapters {
        let chain = adapter.chain_code();
        if let Some(wanted) = &wanted {
            if !wanted.contains(chain) {
                continue;
            }
        }

        if already_succeeded(&pool, chain, crawl_date).await? {
            info!(chain, date = %crawl_date, "already SUCCESS for this date, skipping");
            continue;
        }

        match crawl_one_chain(&pool, adapter.as_ref(), crawl_date, &date_dir, &g_products_map).await {
            Ok(path) => archive_paths.push(path),
            Err(e) => error!(chain, error = %e, "chain crawl failed"),
        }
    }

    info!(count = archive_paths.len(), date = %crawl_date, "crawl complete");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
enum CrawlError {
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),
    #[error("archive error: {0}")]
    Archive(#[from] polica_adapters::archive::ArchiveError),
    #[error("db error: {0}")]
    Db(#[from] InfraError),
}

async fn already_succeeded(pool: &Pool, chain: &str, date: chrono::NaiveDate) -> Result<bool, InfraError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    let chain = chain.to_string();
    let latest = conn
        .interact(move |conn| CrawlRun::latest_for_chain_and_date(conn, &chain, date))
        .await
        .map_err(InfraError::from)??;
    Ok(latest.is_some_and(|r| r.status() == RunStatus::Success))
}

/// Runs steps (a)-(d) of spec.md §4.C for one chain. A crash between
/// "report STARTED" and "report SUCCESS/FAILED" is recoverable: the next
/// invocation sees no terminal `CrawlRun` for `(chain, date)` and retries.
async fn crawl_one_chain(
    pool: &Pool,
    adapter: &dyn ChainAdapter,
    date: chrono::NaiveDate,
    date_dir: &Path,
    g_products_map: &HashMap<String, GoldenLookup>,
) -> Result<std::path::PathBuf, CrawlError> {
    let chain = adapter.chain_code();

    let run_id = {
        let conn = pool.get().await.map_err(InfraError::from)?;
        let chain = chain.to_string();
        conn.interact(move |conn| CrawlRun::start(conn, &chain, date))
            .await
            .map_err(InfraError::from)??
            .id
    };

    let started_at = Instant::now();
    let outcome = run_crawl_body(adapter, date, date_dir, g_products_map).await;
    let elapsed = started_at.elapsed().as_secs_f64();

    let conn = pool.get().await.map_err(InfraError::from)?;
    match outcome {
        Ok((path, n_stores, n_products, n_prices)) => {
            conn.interact(move |conn| {
                CrawlRun::finish(conn, run_id, RunStatus::Success, None, n_stores, n_products, n_prices, elapsed)
            })
            .await
            .map_err(InfraError::from)??;
            info!(chain, n_stores, n_products, n_prices, "chain crawl succeeded");
            Ok(path)
        }
        Err(e) => {
            let message = e.to_string();
            conn.interact(move |conn| {
                CrawlRun::finish(conn, run_id, RunStatus::Failed, Some(message), 0, 0, 0, elapsed)
            })
            .await
            .map_err(InfraError::from)??;
            Err(e)
        }
    }
}

type CrawlBodyResult = (std::path::PathBuf, i32, i32, i32);

async fn run_crawl_body(
    adapter: &dyn ChainAdapter,
    date: chrono::NaiveDate,
    date_dir: &Path,
    g_products_map: &HashMap<String, GoldenLookup>,
) -> Result<CrawlBodyResult, CrawlError> {
    let chain = adapter.chain_code();
    let stores = adapter.get_all_products(date).await?;
    if stores.is_empty() {
        return Err(CrawlError::Adapter(AdapterError::NoData { chain: chain.to_string(), date }));
    }

    let n_stores = stores.len() as i32;
    let mut seen_products = std::collections::HashSet::new();
    let mut n_prices = 0i32;
    for store in &stores {
        for item in &store.items {
            seen_products.insert(item.product_id.clone());
            n_prices += 1;
        }
    }
    let n_products = seen_products.len() as i32;

    let zip_path = date_dir.join(format!("{chain}.zip"));
    write_archive_atomically(chain, date, &stores, g_products_map, &zip_path)?;

    Ok((zip_path, n_stores, n_products, n_prices))
}

/// Writes into a scoped temp file first, then renames into place, so a
/// crash mid-write never leaves a half-written archive at the final path
/// for the importer to pick up (spec.md §4.C step 4's temp-state cleanup).
fn write_archive_atomically(
    chain: &str,
    date: chrono::NaiveDate,
    stores: &[AdapterStore],
    g_products_map: &HashMap<String, GoldenLookup>,
    final_path: &Path,
) -> Result<(), polica_adapters::archive::ArchiveError> {
    let tmp_path = final_path.with_extension("zip.tmp");
    write_chain_archive(chain, date, stores, g_products_map, &tmp_path)?;
    std::fs::rename(&tmp_path, final_path)?;
    Ok(())
}

/// Loads the EAN → golden-product lookup once per crawl batch (spec.md
/// §4.C step 1), used by the archive writer to populate `g_prices.csv`.
async fn load_g_products_map(pool: &Pool) -> Result<HashMap<String, GoldenLookup>, InfraError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    let rows = conn
        .interact(GProduct::all_for_archive_lookup)
        .await
        .map_err(InfraError::from)??;

    let mut map = HashMap::with_capacity(rows.len());
    for (ean, id, base_unit_type, variants) in rows {
        let base_unit_type = base_unit_type.parse().unwrap_or(polica_common::BaseUnitType::Count);
        let variants = serde_json::from_value(variants).unwrap_or_default();
        map.insert(ean, GoldenLookup { id, base_unit_type, variants });
    }
    warn_if_empty(&map);
    Ok(map)
}

fn warn_if_empty(map: &HashMap<String, GoldenLookup>) {
    if map.is_empty() {
        warn!("g_products_map is empty; every g_price row will be skipped until the normalizer runs");
    }
}
