use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "sifra_proizvoda",
    barcode: "barkod",
    name: "naziv_proizvoda",
    brand: "marka_proizvoda",
    category: "kategorija_proizvoda",
    unit: "jedinica_mjere",
    quantity: "neto_kolicina",
    price: "mpc",
    special_price: "mpc_posebni_oblik_prodaje",
    unit_price: "cijena_po_jm",
    best_price_30: "najniza_cijena_30_dana",
    anchor_price: "sidrena_cijena_2_5_2025",
};

pub struct StudenacAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl StudenacAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for StudenacAdapter {
    fn chain_code(&self) -> &'static str {
        "studenac"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_studenac_csv_dialect() {
        let csv = "sifra_proizvoda,barkod,naziv_proizvoda,marka_proizvoda,kategorija_proizvoda,jedinica_mjere,neto_kolicina,mpc,mpc_posebni_oblik_prodaje,cijena_po_jm,najniza_cijena_30_dana,sidrena_cijena_2_5_2025\n\
                   ST51,5900102016316,Tjestenina spaghetti 500g,Barilla,tjestenina,g,500,1.89,1.69,3.78,1.79,1.89\n";
        let products = parse_store_csv("studenac", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].special_price.as_ref().unwrap().to_string(), "1.69");
    }
}
