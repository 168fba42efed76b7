use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "sifra",
    barcode: "barkod",
    name: "naziv",
    brand: "marka",
    category: "kategorija",
    unit: "mjerna_jedinica",
    quantity: "kolicina",
    price: "mpc",
    special_price: "akcijska_mpc",
    unit_price: "mpc_jedinica_mjere",
    best_price_30: "najniza_mpc_30dana",
    anchor_price: "sidrena_mpc_2_5_2025",
};

pub struct TommyAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl TommyAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for TommyAdapter {
    fn chain_code(&self) -> &'static str {
        "tommy"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tommy_csv_dialect() {
        let csv = "sifra,barkod,naziv,marka,kategorija,mjerna_jedinica,kolicina,mpc,akcijska_mpc,mpc_jedinica_mjere,najniza_mpc_30dana,sidrena_mpc_2_5_2025\n\
                   TM14,3017620422003,Nutella 350g,Ferrero,slatkiši,g,350,3.19,,9.11,3.09,3.19\n";
        let products = parse_store_csv("tommy", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity.as_deref(), Some("350"));
    }
}
