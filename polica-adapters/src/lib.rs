//! Chain adapter interface (spec.md §4.A) and archive writer (spec.md §4.B).
//!
//! Adapters are pure with respect to the database: they only perform
//! HTTP/parsing and hand back plain [`AdapterStore`]/[`AdapterProduct`]
//! rows. `polica-crawler` is the only caller that talks to Postgres.

pub mod archive;
pub mod sources;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use thiserror::Error;

/// One store's price rows for a single crawl date (spec.md §4.A).
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterStore {
    pub code: String,
    pub store_type: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub items: Vec<AdapterProduct>,
}

/// One chain-local price row within a store.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterProduct {
    /// Chain-local product code (`ChainProduct.code`).
    pub product_id: String,
    /// Official barcode if the chain publishes one; `None` triggers the
    /// `"<chain>:<product_id>"` synthetic barcode at import time (spec.md §4.D).
    pub barcode: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<String>,
    pub price: BigDecimal,
    pub special_price: Option<BigDecimal>,
    pub unit_price: Option<BigDecimal>,
    pub best_price_30: Option<BigDecimal>,
    pub anchor_price: Option<BigDecimal>,
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no data available for {chain} on {date}")]
    NoData { chain: String, date: NaiveDate },
    #[error("fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Shared capability every per-chain crawler implements (spec.md §4.A).
/// Adapters fail-fast with [`AdapterError`] if no data is available for
/// the requested date; they never touch the database.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// The `Chain.code` this adapter feeds (e.g. `"konzum"`).
    fn chain_code(&self) -> &'static str;

    async fn get_all_products(&self, date: NaiveDate) -> Result<Vec<AdapterStore>, AdapterError>;
}
