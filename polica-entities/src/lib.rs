pub mod connection;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod pagination;
pub mod schema;

pub use error::{adapt_infra_error, ErrorKind, InfraError};
pub use pagination::{PaginationParams, PaginationResponse};

pub use models::chain::Chain;
pub use models::chain_price::ChainPrice;
pub use models::chain_product::ChainProduct;
pub use models::chain_stats::ChainStats;
pub use models::chat_message::{ChatMessage, NewChatMessage, Sender};
pub use models::crawl_run::{CrawlRun, NewCrawlRun};
pub use models::g_price::{GPrice, NewGPrice};
pub use models::g_product::{GProduct, NewGProduct};
pub use models::g_product_best_offer::{CandidateOffer, GProductBestOffer};
pub use models::import_run::{ImportCounters, ImportRun, NewImportRun};
pub use models::price::{NewPrice, Price};
pub use models::product::{NewProduct, Product};
pub use models::shopping_list::{NewShoppingList, NewShoppingListItem, ShoppingList, ShoppingListItem};
pub use models::store::{NewStore, Store};
pub use models::user::{NewUser, NewUserLocation, NewUserPersonalData, User, UserLocation, UserPersonalData};

pub use dto::{ChatMessageDto, GProductBestOfferDto, GoldenProductDto, StoreDto, StoreWithDistanceDto, UserDto};
