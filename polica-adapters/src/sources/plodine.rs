use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "sifra_artikla",
    barcode: "barkod",
    name: "naziv_artikla",
    brand: "marka",
    category: "kategorija",
    unit: "jedinica_mjere",
    quantity: "kolicina",
    price: "mpc",
    special_price: "posebna_mpc",
    unit_price: "mpc_po_jedinici_mjere",
    best_price_30: "najniza_mpc_30_dana",
    anchor_price: "sidrena_mpc",
};

pub struct PlodineAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl PlodineAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for PlodineAdapter {
    fn chain_code(&self) -> &'static str {
        "plodine"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plodine_csv_dialect() {
        let csv = "sifra_artikla,barkod,naziv_artikla,marka,kategorija,jedinica_mjere,kolicina,mpc,posebna_mpc,mpc_po_jedinici_mjere,najniza_mpc_30_dana,sidrena_mpc\n\
                   PL12,3850104000012,Jaja M 10kom,Plodine,jaja,kom,10,2.79,,0.28,2.69,2.79\n";
        let products = parse_store_csv("plodine", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].unit.as_deref(), Some("kom"));
    }
}
