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
    price: "maloprodajna_cijena",
    special_price: "mpc_za_vrijeme_posebnog_oblika_prodaje",
    unit_price: "cijena_za_jedinicu_mjere",
    best_price_30: "najniza_cijena_u_poslj_30_dana",
    anchor_price: "sidrena_cijena_na_2_5_2025",
};

pub struct KonzumAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl KonzumAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for KonzumAdapter {
    fn chain_code(&self) -> &'static str {
        "konzum"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_konzum_csv_dialect() {
        let csv = "sifra_proizvoda,barkod,naziv_proizvoda,marka_proizvoda,kategorija_proizvoda,jedinica_mjere,neto_kolicina,maloprodajna_cijena,mpc_za_vrijeme_posebnog_oblika_prodaje,cijena_za_jedinicu_mjere,najniza_cijena_u_poslj_30_dana,sidrena_cijena_na_2_5_2025\n\
                   K001,3858881234567,Kruh bijeli 500g,Konzum,pekarski proizvodi,g,500,1.49,,2.98,1.49,1.39\n";
        let products = parse_store_csv("konzum", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Kruh bijeli 500g");
        assert_eq!(products[0].price.to_string(), "1.49");
        assert!(products[0].special_price.is_none());
    }
}
