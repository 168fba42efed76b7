use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "artikl_sifra",
    barcode: "ean_kod",
    name: "artikl_naziv",
    brand: "brend",
    category: "kategorija_artikla",
    unit: "mjerna_jedinica",
    quantity: "neto_kolicina",
    price: "maloprodajna_cijena",
    special_price: "akcijska_cijena",
    unit_price: "cijena_mjerne_jedinice",
    best_price_30: "najniza_cijena_zadnjih_30_dana",
    anchor_price: "sidrena_cijena",
};

pub struct KauflandAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl KauflandAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for KauflandAdapter {
    fn chain_code(&self) -> &'static str {
        "kaufland"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kaufland_csv_dialect() {
        let csv = "artikl_sifra,ean_kod,artikl_naziv,brend,kategorija_artikla,mjerna_jedinica,neto_kolicina,maloprodajna_cijena,akcijska_cijena,cijena_mjerne_jedinice,najniza_cijena_zadnjih_30_dana,sidrena_cijena\n\
                   KF77,4000417025005,Pivo svijetlo 0.5L,Ozujsko,pivo,l,0.5,1.19,0.99,2.38,1.09,1.19\n";
        let products = parse_store_csv("kaufland", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].special_price.as_ref().unwrap().to_string(), "0.99");
    }
}
