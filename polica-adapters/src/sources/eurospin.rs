use async_trait::async_trait;
use chrono::NaiveDate;

use crate::sources::common::{fetch_all_stores, parse_store_csv, ColumnMap};
use crate::{AdapterError, AdapterStore, ChainAdapter};

const COLUMNS: ColumnMap = ColumnMap {
    product_id: "codice_articolo",
    barcode: "barcode",
    name: "nome_articolo",
    brand: "marca",
    category: "categoria",
    unit: "unita_misura",
    quantity: "quantita_netta",
    price: "prezzo_vendita",
    special_price: "prezzo_offerta",
    unit_price: "prezzo_per_unita_misura",
    best_price_30: "prezzo_minimo_30_giorni",
    anchor_price: "prezzo_ancora",
};

pub struct EurospinAdapter {
    client: reqwest::Client,
    index_url: String,
}

impl EurospinAdapter {
    pub fn new(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self { client, index_url: index_url.into() }
    }
}

#[async_trait]
impl ChainAdapter for EurospinAdapter {
    fn chain_code(&self) -> &'static str {
        "eurospin"
    }

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError> {
        fetch_all_stores(&self.client, self.chain_code(), &self.index_url, date, &COLUMNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eurospin_csv_dialect() {
        let csv = "codice_articolo,barcode,nome_articolo,marca,categoria,unita_misura,quantita_netta,prezzo_vendita,prezzo_offerta,prezzo_per_unita_misura,prezzo_minimo_30_giorni,prezzo_ancora\n\
                   EU301,8000500310427,Nutella 400g,Ferrero,slatkiši,g,400,3.49,,8.73,3.29,3.49\n";
        let products = parse_store_csv("eurospin", csv.as_bytes(), &COLUMNS).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Nutella 400g");
    }
}
