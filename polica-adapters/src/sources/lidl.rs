use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "sifra",
    barcode: "ean",
    name: "naziv",
    brand: "marka",
    category: "kategorija",
    unit: "jmj",
    quantity: "neto_kolicina",
    price: "mpc",
    special_price: "mpc_posebna_prodaja",
    unit_price: "cijena_jmj",
    best_price_30: "najniza_cijena_30dana",
    anchor_price: "sidrena_cijena",
};

pub struct LidlAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl LidlAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for LidlAdapter {
    fn chain_code(&self) -> &'static str {
        "lidl"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lidl_csv_dialect() {
        let csv = "sifra,ean,naziv,marka,kategorija,jmj,neto_kolicina,mpc,mpc_posebna_prodaja,cijena_jmj,najniza_cijena_30dana,sidrena_cijena\n\
                   L045,4005808327567,Jogurt jagoda 150g,Lidl,mlijecni proizvodi,g,150,0.59,0.49,3.93,0.55,0.59\n";
        let products = parse_store_csv("lidl", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].barcode.as_deref(), Some("4005808327567"));
        assert_eq!(products[0].special_price.as_ref().unwrap().to_string(), "0.49");
    }
}
