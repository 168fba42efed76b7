pub mod chain;
pub mod chain_price;
pub mod chain_product;
pub mod chain_stats;
pub mod chat_message;
pub mod crawl_run;
pub mod g_price;
pub mod g_product;
pub mod g_product_best_offer;
pub mod import_run;
pub mod price;
pub mod product;
pub mod shopping_list;
pub mod store;
pub mod user;

pub(crate) type DieselResult<T> = Result<T, diesel::result::Error>;
