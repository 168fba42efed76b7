pub mod config;
mod aggregate;
mod barcode;
mod error;
mod import;
mod records;

use std::sync::Arc;

use chrono::Utc;
use dotenvy::dotenv;
use polica_entities::{connection::init_pool, ImportRun};
use polica_common::RunStatus;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::{timeout, Duration, Instant};
use tracing::{error, info, warn};

use crate::config::load_configuration;
use crate::import::{claim_run, import_body, ImportClaim};

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = load_configuration();
    polica_common::telemetry::init_telemetry("polica-importer".into(), args.otel_endpoint.clone())?;

    let pool = init_pool("polica-importer")?;
    let import_date = args.import_date.unwrap_or_else(|| Utc::now().date_naive());

    let mut chains = Vec::new();
    for entry in std::fs::read_dir(&args.archive_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("zip") {
            if let Some(chain_name) = path.file_stem().and_then(|s| s.to_str()) {
                chains.push((chain_name.to_string(), path));
            }
        }
    }

    info!(count = chains.len(), date = %import_date, "discovered chain archives");

    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let recompute_lock = Arc::new(Mutex::new(()));
    let timeout_duration = Duration::from_secs(args.timeout_secs);

    let mut handles = Vec::new();
    for (chain_name, zip_path) in chains {
        let claim = claim_run(&pool, None, chain_name.clone(), import_date).await?;
        let run = match claim {
            ImportClaim::Skipped(_run) => {
                info!(chain = %chain_name, date = %import_date, "import already SUCCESS, skipping");
                continue;
            }
            ImportClaim::Proceed(run) => run,
        };

        let pool = pool.clone();
        let semaphore = semaphore.clone();
        let recompute_lock = recompute_lock.clone();
        let run_id = run.id;

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let started_at = Instant::now();

            let result = timeout(
                timeout_duration,
                import_body(pool.clone(), chain_name.clone(), import_date, zip_path, recompute_lock),
            )
            .await;

            let elapsed = started_at.elapsed().as_secs_f64();
            let outcome = match result {
                Ok(Ok(counters)) => (RunStatus::Success, None, counters),
                Ok(Err(e)) => {
                    error!(chain = %chain_name, error = %e, "import failed");
                    (RunStatus::Failed, Some(e.to_string()), Default::default())
                }
                Err(_elapsed) => {
                    warn!(chain = %chain_name, "import timed out");
                    (RunStatus::Failed, Some(format!("timed out after {timeout_duration:?}")), Default::default())
                }
            };

            let conn = pool.get().await.expect("db pool exhausted while finishing run");
            let (status, error_message, counters) = outcome;
            conn.interact(move |conn| ImportRun::finish(conn, run_id, status, error_message, counters, elapsed))
                .await
                .expect("interact task panicked")
                .expect("failed to persist final import run status");
        }));
    }

    for handle in handles {
        handle.await?;
    }

    Ok(())
}
