//! Per-chain import engine (spec.md §4.D).

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use deadpool_diesel::postgres::Pool;
use polica_common::csv_dialect::{decode_with_cp1250_fallback, reader_builder};
use polica_entities::{
    Chain, ChainProduct, ImportCounters, ImportRun, InfraError, NewChainProduct, NewPrice,
    NewProduct, NewStore, Product, Store,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::aggregate::recompute_aggregates_for_date;
use crate::barcode::clean_barcode;
use crate::error::ImportError;
use crate::records::{parse_optional_price, PriceRow, ProductRow, StoreRow};

pub(crate) enum ImportClaim {
    /// A `SUCCESS` run for `(chain, date)` already exists; the existing row
    /// is returned untouched (spec.md §4.D step 1).
    Skipped(ImportRun),
    /// Import may proceed under this run id.
    Proceed(ImportRun),
}

/// Opens or re-opens the `(chain_name, import_date)` slot (spec.md §4.D
/// step 1, and the importer's retry rule described in
/// `polica_entities::ImportRun::restart`).
pub(crate) async fn claim_run(
    pool: &Pool,
    crawl_run_id: Option<Uuid>,
    chain_name: String,
    date: NaiveDate,
) -> Result<ImportClaim, InfraError> {
    let conn = pool.get().await.map_err(InfraError::from)?;
    let claimed = conn
        .interact(move |conn| -> Result<ImportClaim, diesel::result::Error> {
            if let Some(run) = ImportRun::try_start(conn, crawl_run_id, &chain_name, date, None)? {
                return Ok(ImportClaim::Proceed(run));
            }

            let existing = ImportRun::get_by_chain_and_date(conn, &chain_name, date)?
                .expect("try_start conflicted so a row must exist");

            if existing.status() == polica_common::RunStatus::Success {
                Ok(ImportClaim::Skipped(existing))
            } else {
                let restarted = ImportRun::restart(conn, existing.id, crawl_run_id, None)?;
                Ok(ImportClaim::Proceed(restarted))
            }
        })
        .await
        .map_err(InfraError::from)??;
    Ok(claimed)
}

/// Runs the full import sequence for one chain's archive (spec.md §4.D
/// steps 2-7), not including the terminal `ImportRun::finish` — the caller
/// owns that so it can distinguish a timeout from an in-body failure.
pub(crate) async fn import_body(
    pool: Pool,
    chain_name: String,
    date: NaiveDate,
    zip_path: std::path::PathBuf,
    recompute_lock: Arc<Mutex<()>>,
) -> Result<ImportCounters, ImportError> {
    let (stores, products, prices) = tokio::task::spawn_blocking(move || read_archive(&zip_path))
        .await
        .expect("blocking extraction task panicked")?;

    let chain_name_for_blocking = chain_name.clone();
    let conn = pool.get().await.map_err(InfraError::from)?;
    let counters = conn
        .interact(move |conn| -> Result<ImportCounters, diesel::result::Error> {
            let mut counters = ImportCounters::default();

            let chain = Chain::upsert_by_code(conn, &chain_name_for_blocking)?;

            let mut store_ids = HashMap::new();
            for row in &stores {
                let stored = Store::upsert(
                    conn,
                    NewStore {
                        chain_id: chain.id,
                        code: row.store_id.clone(),
                        type_: row.r#type.clone(),
                        address: row.address.clone(),
                        city: row.city.clone(),
                        zipcode: row.zipcode.clone(),
                        lat: None,
                        lon: None,
                        phone: None,
                    },
                )?;
                store_ids.insert(row.store_id.clone(), stored.id);
                counters.stores_upserted += 1;
            }

            let cleaned: Vec<(String, String)> = products
                .iter()
                .map(|p| (p.product_id.clone(), clean_barcode(&chain_name_for_blocking, &p.product_id, p.barcode.as_deref())))
                .collect();

            let distinct_eans: Vec<String> = cleaned.iter().map(|(_, ean)| ean.clone()).collect::<HashSet<_>>().into_iter().collect();
            let mut ean_to_product_id: HashMap<String, Uuid> =
                Product::existing_eans(conn, &distinct_eans)?.into_iter().collect();

            let new_products: Vec<NewProduct> = products
                .iter()
                .zip(cleaned.iter())
                .filter(|(_, (_, ean))| !ean_to_product_id.contains_key(ean))
                .map(|(row, (_, ean))| NewProduct {
                    ean: ean.as_str(),
                    brand: row.brand.as_deref(),
                    name: Some(row.name.as_str()),
                    quantity: row.quantity.as_deref(),
                    unit: row.unit.as_deref(),
                })
                .collect();

            if !new_products.is_empty() {
                let inserted = Product::insert_many(conn, new_products)?;
                counters.products_inserted += inserted.len() as i64;
                for product in inserted {
                    ean_to_product_id.insert(product.ean.clone(), product.id);
                }
            }
            // A row whose EAN collided with another row in this same batch
            // (insert_many used ON CONFLICT DO NOTHING) still needs its id.
            let remaining: Vec<String> = cleaned
                .iter()
                .map(|(_, ean)| ean.clone())
                .filter(|ean| !ean_to_product_id.contains_key(ean))
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            if !remaining.is_empty() {
                for (ean, id) in Product::existing_eans(conn, &remaining)? {
                    ean_to_product_id.insert(ean, id);
                }
            }

            let new_chain_products: Vec<NewChainProduct> = products
                .iter()
                .zip(cleaned.iter())
                .filter_map(|(row, (_, ean))| {
                    let product_id = *ean_to_product_id.get(ean)?;
                    Some(NewChainProduct {
                        chain_id: chain.id,
                        product_id,
                        code: row.product_id.clone(),
                        name: row.name.clone(),
                        brand: row.brand.clone(),
                        category: row.category.clone(),
                        unit: row.unit.clone(),
                        quantity: row.quantity.clone(),
                    })
                })
                .collect();

            if !new_chain_products.is_empty() {
                counters.chain_products_inserted +=
                    ChainProduct::insert_many_ignore_conflicts(conn, new_chain_products)? as i64;
            }

            let mut chain_product_ids: HashMap<String, Uuid> = HashMap::new();
            for row in &products {
                if let Ok(cp) = ChainProduct::get_by_chain_and_code(conn, chain.id, &row.product_id) {
                    chain_product_ids.insert(row.product_id.clone(), cp.id);
                }
            }

            let mut seen_price_keys = HashSet::new();
            let mut new_prices = Vec::new();
            for row in &prices {
                let (Some(&store_id), Some(&chain_product_id)) =
                    (store_ids.get(&row.store_id), chain_product_ids.get(&row.product_id))
                else {
                    counters.rows_skipped_invalid += 1;
                    continue;
                };
                let key = (chain_product_id, store_id, date);
                if !seen_price_keys.insert(key) {
                    counters.rows_skipped_invalid += 1;
                    continue;
                }
                new_prices.push(NewPrice {
                    chain_product_id,
                    store_id,
                    price_date: date,
                    regular_price: parse_optional_price(&row.price),
                    special_price: parse_optional_price(&row.special_price),
                    unit_price: parse_optional_price(&row.unit_price),
                    best_price_30: parse_optional_price(&row.best_price_30),
                    anchor_price: parse_optional_price(&row.anchor_price),
                });
            }

            if !new_prices.is_empty() {
                counters.prices_inserted += polica_entities::Price::insert_many_ignore_conflicts(conn, new_prices)? as i64;
            }

            Ok(counters)
        })
        .await
        .map_err(InfraError::from)?
        .map_err(InfraError::from)?;

    {
        let _guard = recompute_lock.lock().await;
        recompute_aggregates_for_date(&pool, date).await?;
    }

    Ok(counters)
}

type ArchiveRows = (Vec<StoreRow>, Vec<ProductRow>, Vec<PriceRow>);

fn read_archive(zip_path: &Path) -> Result<ArchiveRows, ImportError> {
    let file = std::fs::File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let stores = read_csv_entry::<StoreRow>(&mut archive, "stores.csv")?;
    let products = read_csv_entry::<ProductRow>(&mut archive, "products.csv")?;
    let prices = read_csv_entry::<PriceRow>(&mut archive, "prices.csv")?;

    Ok((stores, products, prices))
}

fn read_csv_entry<T: serde::de::DeserializeOwned>(
    archive: &mut zip::ZipArchive<std::fs::File>,
    name: &str,
) -> Result<Vec<T>, ImportError> {
    use std::io::Read;

    let mut entry = archive.by_name(name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    let text = decode_with_cp1250_fallback(&bytes);

    let mut reader = reader_builder().from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
