use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "product_code",
    barcode: "barcode",
    name: "product_name",
    brand: "brand",
    category: "category",
    unit: "unit_of_measure",
    quantity: "net_quantity",
    price: "retail_price",
    special_price: "special_offer_price",
    unit_price: "unit_price",
    best_price_30: "lowest_price_30_days",
    anchor_price: "anchor_price",
};

pub struct SparAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl SparAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for SparAdapter {
    fn chain_code(&self) -> &'static str {
        "spar"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spar_csv_dialect() {
        let csv = "product_code,barcode,product_name,brand,category,unit_of_measure,net_quantity,retail_price,special_offer_price,unit_price,lowest_price_30_days,anchor_price\n\
                   SP900,8606019238340,Cedevita narandza 200g,Cedevita,napici,g,200,2.29,,11.45,2.19,2.29\n";
        let products = parse_store_csv("spar", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].unit.as_deref(), Some("g"));
        assert_eq!(products[0].quantity.as_deref(), Some("200"));
    }
}
