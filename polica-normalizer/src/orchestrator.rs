//! The supervisor side of spec.md §4.E: partitions outstanding work into
//! batches and fans them out to short-lived worker *processes* (not
//! threads, per spec.md §5) by re-exec'ing this same binary with the
//! `normalize`/`best-offer` subcommands. A crashed worker process taking
//! down one batch never affects its siblings or the supervisor.

use std::process::Stdio;

use deadpool_diesel::postgres::Pool;
use polica_entities::{ChainProduct, GProduct, InfraError};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::NormalizerError;

/// Safety bound on how many sweeps `run_normalize_pass` will attempt before
/// giving up on a batch that keeps producing unprocessable EANs, so a
/// handful of permanently-broken rows can never wedge the orchestrator.
const MAX_SWEEPS: u32 = 50;

pub async fn run_normalize_pass(
    pool: &Pool,
    worker_count: usize,
    batch_size: i64,
    chat_model: &str,
    embedding_model: &str,
) -> Result<(), NormalizerError> {
    let page_size = batch_size * worker_count as i64;

    for sweep in 0..MAX_SWEEPS {
        let page = {
            let conn = pool.get().await.map_err(InfraError::from)?;
            conn.interact(move |conn| ChainProduct::unprocessed_product_ids_in_range(conn, Uuid::nil(), page_size))
                .await
                .map_err(InfraError::from)??
        };
        if page.is_empty() {
            info!(sweep, "normalize pass complete: no unprocessed products remain");
            return Ok(());
        }
        info!(sweep, remaining = page.len(), "normalize pass: starting round of worker processes");

        let exe = current_exe()?;
        let semaphore = std::sync::Arc::new(Semaphore::new(worker_count));
        let mut handles = Vec::with_capacity(worker_count);
        for chunk in page.chunks(batch_size as usize) {
            let Some(&start_id) = chunk.first() else { continue };
            let len = chunk.len() as i64;
            let exe = exe.clone();
            let chat_model = chat_model.to_string();
            let embedding_model = embedding_model.to_string();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                spawn_worker(
                    &exe,
                    &[
                        "normalize",
                        "--start-id",
                        &start_id.to_string(),
                        "--batch-size",
                        &len.to_string(),
                        "--chat-model",
                        &chat_model,
                        "--embedding-model",
                        &embedding_model,
                    ],
                )
                .await
            }));
        }
        await_all(handles).await;
    }

    warn!(sweeps = MAX_SWEEPS, "normalize pass hit its sweep cap with unprocessed products remaining");
    Ok(())
}

pub async fn run_best_offer_pass(pool: &Pool, worker_count: usize, batch_size: i64) -> Result<(), NormalizerError> {
    let mut cursor = Uuid::nil();
    let page_size = batch_size * worker_count as i64;

    loop {
        let page = {
            let conn = pool.get().await.map_err(InfraError::from)?;
            conn.interact(move |conn| GProduct::list_in_range(conn, cursor, page_size))
                .await
                .map_err(InfraError::from)??
        };
        if page.is_empty() {
            info!("best-offer pass complete");
            return Ok(());
        }

        let exe = current_exe()?;
        let semaphore = std::sync::Arc::new(Semaphore::new(worker_count));
        let mut handles = Vec::new();
        for chunk in page.chunks(batch_size as usize) {
            let Some(first) = chunk.first() else { continue };
            let start_id = first.id;
            let len = chunk.len() as i64;
            let exe = exe.clone();
            let semaphore = semaphore.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                spawn_worker(
                    &exe,
                    &["best-offer", "--start-id", &start_id.to_string(), "--batch-size", &len.to_string()],
                )
                .await
            }));
        }
        await_all(handles).await;

        cursor = next_uuid(page.last().expect("page checked non-empty above").id);
        if page.len() < page_size as usize {
            info!("best-offer pass complete");
            return Ok(());
        }
    }
}

fn current_exe() -> Result<std::path::PathBuf, NormalizerError> {
    std::env::current_exe().map_err(|e| NormalizerError::InvalidCanonicalRecord(format!("cannot resolve own executable path: {e}")))
}

async fn spawn_worker(exe: &std::path::Path, args: &[&str]) {
    let outcome = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .await;
    match outcome {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(?status, args = ?args, "normalizer worker process exited non-zero"),
        Err(e) => warn!(error = %e, args = ?args, "failed to spawn normalizer worker process"),
    }
}

async fn await_all(handles: Vec<tokio::task::JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "normalizer worker supervisor task panicked");
        }
    }
}

/// `id + 1` treating the UUID as a big-endian 128-bit integer, wrapping at
/// the top of the space. Used to advance the best-offer pass's cursor past
/// the last id of a page.
fn next_uuid(id: Uuid) -> Uuid {
    Uuid::from_u128(id.as_u128().wrapping_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_uuid_increments() {
        let id = Uuid::from_u128(5);
        assert_eq!(next_uuid(id), Uuid::from_u128(6));
    }

    #[test]
    fn next_uuid_wraps_at_max() {
        let id = Uuid::from_u128(u128::MAX);
        assert_eq!(next_uuid(id), Uuid::from_u128(0));
    }
}
