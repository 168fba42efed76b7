//! Archive writer (spec.md §4.B): turns one chain's in-memory stores into
//! the four fixed-column CSVs and packs them into a deflated ZIP.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use polica_common::{compute_unit_prices, BaseUnitType, Variant};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::{AdapterProduct, AdapterStore};

/// What the archive writer needs to know about an already-normalized
/// golden product to compute `g_prices.csv` rows (spec.md §4.B).
#[derive(Debug, Clone)]
pub struct GoldenLookup {
    pub id: Uuid,
    pub base_unit_type: BaseUnitType,
    pub variants: Vec<Variant>,
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Writes `stores.csv`, `products.csv`, `prices.csv`, `g_prices.csv` for one
/// chain into `output_zip_path` (spec.md §4.B, §6). `chain` is used only to
/// synthesize barcodes for products lacking one (`"<chain>:<code>"`,
/// matching spec.md §4.D's cleaning rule so the archive and the importer
/// agree on synthetic EANs).
pub fn write_chain_archive(
    chain: &str,
    date: NaiveDate,
    stores: &[AdapterStore],
    g_products_map: &HashMap<String, GoldenLookup>,
    output_zip_path: &Path,
) -> Result<(), ArchiveError> {
    let file = std::fs::File::create(output_zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(9));

    zip.start_file("stores.csv", options)?;
    write_stores_csv(&mut zip, stores)?;

    zip.start_file("products.csv", options)?;
    write_products_csv(&mut zip, chain, stores)?;

    zip.start_file("prices.csv", options)?;
    write_prices_csv(&mut zip, stores)?;

    zip.start_file("g_prices.csv", options)?;
    write_g_prices_csv(&mut zip, chain, date, stores, g_products_map)?;

    zip.finish()?;
    Ok(())
}

fn write_stores_csv<W: Write>(w: &mut W, stores: &[AdapterStore]) -> Result<(), ArchiveError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(w);
    csv_writer.write_record(["store_id", "type", "address", "city", "zipcode"])?;
    for store in stores {
        csv_writer.write_record([
            &store.code,
            store.store_type.as_deref().unwrap_or(""),
            store.address.as_deref().unwrap_or(""),
            store.city.as_deref().unwrap_or(""),
            store.zipcode.as_deref().unwrap_or(""),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_products_csv<W: Write>(w: &mut W, chain: &str, stores: &[AdapterStore]) -> Result<(), ArchiveError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(w);
    csv_writer.write_record(["product_id", "barcode", "name", "brand", "category", "unit", "quantity"])?;

    // A product appears once per store it's sold in; de-dupe on product_id
    // like the source's `product_map` (spec.md §4.B).
    let mut seen = std::collections::HashSet::new();
    for store in stores {
        for item in &store.items {
            if !seen.insert(item.product_id.clone()) {
                continue;
            }
            let barcode = synthetic_barcode(chain, item);
            csv_writer.write_record([
                item.product_id.as_str(),
                barcode.as_str(),
                item.name.as_str(),
                item.brand.as_deref().unwrap_or(""),
                item.category.as_deref().unwrap_or(""),
                item.unit.as_deref().unwrap_or(""),
                item.quantity.as_deref().unwrap_or(""),
            ])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_prices_csv<W: Write>(w: &mut W, stores: &[AdapterStore]) -> Result<(), ArchiveError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(w);
    csv_writer.write_record(["store_id", "product_id", "price", "unit_price", "best_price_30", "anchor_price", "special_price"])?;
    for store in stores {
        for item in &store.items {
            csv_writer.write_record([
                store.code.as_str(),
                item.product_id.as_str(),
                &item.price.to_string(),
                &maybe(&item.unit_price),
                &maybe(&item.best_price_30),
                &maybe(&item.anchor_price),
                &maybe(&item.special_price),
            ])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_g_prices_csv<W: Write>(
    w: &mut W,
    chain: &str,
    date: NaiveDate,
    stores: &[AdapterStore],
    g_products_map: &HashMap<String, GoldenLookup>,
) -> Result<(), ArchiveError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(w);
    csv_writer.write_record([
        "g_product_id",
        "store_id",
        "price_date",
        "regular_price",
        "special_price",
        "price_per_kg",
        "price_per_l",
        "price_per_piece",
        "is_on_special_offer",
    ])?;

    for store in stores {
        for item in &store.items {
            let barcode = synthetic_barcode(chain, item);
            let Some(golden) = g_products_map.get(&barcode) else {
                tracing::warn!(barcode, chain, "skipping g_price: EAN not in g_products_map");
                continue;
            };
            let current_price = item.special_price.as_ref().unwrap_or(&item.price);
            let unit_prices = compute_unit_prices(current_price, golden.base_unit_type, golden.variants.first());

            csv_writer.write_record([
                golden.id.to_string(),
                store.code.clone(),
                date.to_string(),
                item.price.to_string(),
                maybe(&item.special_price),
                maybe(&unit_prices.price_per_kg),
                maybe(&unit_prices.price_per_l),
                maybe(&unit_prices.price_per_piece),
                item.special_price.is_some().to_string(),
            ])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn synthetic_barcode(chain: &str, item: &AdapterProduct) -> String {
    item.barcode
        .clone()
        .unwrap_or_else(|| format!("{chain}:{}", item.product_id))
}

fn maybe(value: &Option<BigDecimal>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::str::FromStr;

    fn sample_stores() -> Vec<AdapterStore> {
        vec![AdapterStore {
            code: "S001".into(),
            store_type: Some("supermarket".into()),
            address: Some("Ilica 1".into()),
            city: Some("Zagreb".into()),
            zipcode: Some("10000".into()),
            items: vec![AdapterProduct {
                product_id: "P1".into(),
                barcode: Some("3858881234567".into()),
                name: "Mlijeko 2.8% 1L".into(),
                brand: Some("Dukat".into()),
                category: Some("mliječni proizvodi".into()),
                unit: Some("l".into()),
                quantity: Some("1".into()),
                price: BigDecimal::from_str("1.29").unwrap(),
                special_price: None,
                unit_price: Some(BigDecimal::from_str("1.29").unwrap()),
                best_price_30: None,
                anchor_price: None,
            }],
        }]
    }

    #[test]
    fn writes_four_csvs_into_a_deflated_zip() {
        let dir = std::env::temp_dir().join(format!("polica-archive-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let zip_path = dir.join("konzum.zip");

        let mut g_products_map = HashMap::new();
        g_products_map.insert(
            "3858881234567".to_string(),
            GoldenLookup {
                id: Uuid::new_v4(),
                base_unit_type: BaseUnitType::Volume,
                variants: vec![Variant { unit: "l".into(), value: 1.0, piece_count: None }],
            },
        );

        write_chain_archive(
            "konzum",
            NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            &sample_stores(),
            &g_products_map,
            &zip_path,
        )
        .unwrap();

        let file = std::fs::File::open(&zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut names: Vec<_> = archive.file_names().map(ToString::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["g_prices.csv", "prices.csv", "products.csv", "stores.csv"]);

        let mut g_prices_content = String::new();
        archive.by_name("g_prices.csv").unwrap().read_to_string(&mut g_prices_content).unwrap();
        assert!(g_prices_content.contains("1.29"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_golden_lookup_skips_the_g_price_row_not_the_whole_file() {
        let dir = std::env::temp_dir().join(format!("polica-archive-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let zip_path = dir.join("konzum.zip");

        write_chain_archive(
            "konzum",
            NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
            &sample_stores(),
            &HashMap::new(),
            &zip_path,
        )
        .unwrap();

        let file = std::fs::File::open(&zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut g_prices_content = String::new();
        archive.by_name("g_prices.csv").unwrap().read_to_string(&mut g_prices_content).unwrap();
        // header only, no data rows
        assert_eq!(g_prices_content.lines().count(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
