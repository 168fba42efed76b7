pub mod auth_handlers;
pub mod chat;
pub mod crawler_status;
pub mod importer_status;
pub mod products;
pub mod shopping_lists;
pub mod stores;
pub mod users;
