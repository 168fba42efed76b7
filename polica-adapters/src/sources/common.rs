//! Shared CSV-parsing scaffolding for chains publishing daily per-store
//! price lists under Croatia's retail price transparency rules. Every
//! concrete adapter fetches an index of per-store CSV URLs, downloads each,
//! and maps chain-specific header names onto [`AdapterProduct`] through a
//! [`ColumnMap`] — the column *names* differ per chain, the shape doesn't.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use polica_common::csv_dialect::{decode_with_cp1250_fallback, reader_builder};
use serde::Deserialize;

use crate::{AdapterError, AdapterProduct, AdapterStore};

/// One entry of a chain's published per-store index: every chain's site
/// exposes this list in a slightly different JSON shape, so fields accept
/// the common name variants seen across the chains (spec.md §4.A).
#[derive(Debug, Deserialize)]
pub struct IndexEntry {
    #[serde(alias = "sifra_prodajnog_mjesta", alias = "storeId")]
    pub code: String,
    #[serde(alias = "tip_prodajnog_mjesta", alias = "storeType", default)]
    pub store_type: Option<String>,
    #[serde(alias = "adresa_prodajnog_mjesta", alias = "address", default)]
    pub address: Option<String>,
    #[serde(alias = "grad", alias = "city", default)]
    pub city: Option<String>,
    #[serde(alias = "postanski_broj", alias = "zipcode", default)]
    pub zipcode: Option<String>,
    #[serde(alias = "url", alias = "csvUrl", alias = "link")]
    pub csv_url: String,
}

/// Fetches a chain's per-store index for `date`, then each referenced CSV,
/// parsing it with `columns` into a full [`AdapterStore`] list.
pub async fn fetch_all_stores(
    client: &reqwest::Client,
    chain: &'static str,
    index_url: &str,
    date: NaiveDate,
    columns: &ColumnMap,
) -> Result<Vec<AdapterStore>, AdapterError> {
    let index: Vec<IndexEntry> = client.get(index_url).send().await?.json().await?;
    if index.is_empty() {
        return Err(AdapterError::NoData { chain: chain.to_string(), date });
    }

    let mut stores = Vec::with_capacity(index.len());
    for entry in index {
        let body = client.get(&entry.csv_url).send().await?.bytes().await?;
        let items = parse_store_csv(chain, &body, columns)?;
        stores.push(AdapterStore {
            code: entry.code,
            store_type: entry.store_type,
            address: entry.address,
            city: entry.city,
            zipcode: entry.zipcode,
            items,
        });
    }
    Ok(stores)
}

/// Chain-specific CSV header names for the columns every chain publishes
/// in some form (product code, barcode, name, unit price fields).
pub struct ColumnMap {
    pub product_id: &'static str,
    pub barcode: &'static str,
    pub name: &'static str,
    pub brand: &'static str,
    pub category: &'static str,
    pub unit: &'static str,
    pub quantity: &'static str,
    pub price: &'static str,
    pub special_price: &'static str,
    pub unit_price: &'static str,
    pub best_price_30: &'static str,
    pub anchor_price: &'static str,
}

/// Parses one store's raw CSV body into [`AdapterProduct`] rows using the
/// chain's declared column map. Rows missing the mandatory `price` column
/// are dropped with a warning rather than failing the whole store.
pub fn parse_store_csv(chain: &'static str, body: &[u8], columns: &ColumnMap) -> Result<Vec<AdapterProduct>, AdapterError> {
    let text = decode_with_cp1250_fallback(body);
    let mut reader = reader_builder().from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| AdapterError::Parse(e.to_string()))?.clone();

    let mut products = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AdapterError::Parse(e.to_string()))?;
        let get = |column: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let Some(product_id) = get(columns.product_id) else {
            tracing::warn!(chain, "csv row missing product_id, skipping");
            continue;
        };
        let Some(price) = get(columns.price).and_then(|s| parse_price(&s)) else {
            tracing::warn!(chain, product_id, "csv row missing/invalid price, skipping");
            continue;
        };

        products.push(AdapterProduct {
            product_id,
            barcode: get(columns.barcode),
            name: get(columns.name).unwrap_or_default(),
            brand: get(columns.brand),
            category: get(columns.category),
            unit: get(columns.unit),
            quantity: get(columns.quantity),
            price,
            special_price: get(columns.special_price).and_then(|s| parse_price(&s)),
            unit_price: get(columns.unit_price).and_then(|s| parse_price(&s)),
            best_price_30: get(columns.best_price_30).and_then(|s| parse_price(&s)),
            anchor_price: get(columns.anchor_price).and_then(|s| parse_price(&s)),
        });
    }

    Ok(products)
}

/// Prices are published with a comma decimal separator (`"12,50"`); accept
/// both that and a plain dot.
fn parse_price(raw: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(&raw.replace(',', ".")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> ColumnMap {
        ColumnMap {
            product_id: "sifra",
            barcode: "barkod",
            name: "naziv",
            brand: "marka",
            category: "kategorija",
            unit: "jedinica_mjere",
            quantity: "neto_kolicina",
            price: "maloprodajna_cijena",
            special_price: "cijena_za_vrijeme_posebnog_oblika_prodaje",
            unit_price: "cijena_po_jedinici_mjere",
            best_price_30: "najniza_cijena_u_30_dana",
            anchor_price: "sidrena_cijena",
        }
    }

    #[test]
    fn parses_dot_decimal_prices() {
        let csv = "sifra,barkod,naziv,marka,kategorija,jedinica_mjere,neto_kolicina,maloprodajna_cijena,cijena_za_vrijeme_posebnog_oblika_prodaje,cijena_po_jedinici_mjere,najniza_cijena_u_30_dana,sidrena_cijena\n\
                   P1,3858881234567,Mlijeko 2.8% 1L,Dukat,mlijecni proizvodi,l,1,1.29,,1.29,1.19,1.35\n";
        let products = parse_store_csv("konzum", csv.as_bytes(), &sample_columns()).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "P1");
        assert_eq!(products[0].price.to_string(), "1.29");
    }

    #[test]
    fn drops_rows_without_a_price() {
        let csv = "sifra,barkod,naziv,marka,kategorija,jedinica_mjere,neto_kolicina,maloprodajna_cijena,cijena_za_vrijeme_posebnog_oblika_prodaje,cijena_po_jedinici_mjere,najniza_cijena_u_30_dana,sidrena_cijena\n\
                   P1,,Mlijeko,Dukat,mlijecni proizvodi,l,1,,,,,\n";
        let products = parse_store_csv("konzum", csv.as_bytes(), &sample_columns()).unwrap();
        assert!(products.is_empty());
    }
}
