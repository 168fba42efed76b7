pub mod chat_message;
pub mod golden_product;
pub mod store;
pub mod user;

pub use chat_message::ChatMessageDto;
pub use golden_product::{GProductBestOfferDto, GoldenProductDto};
pub use store::{StoreDto, StoreWithDistanceDto};
pub use user::UserDto;
