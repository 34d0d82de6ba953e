pub mod item_repository;
pub mod market_store;
pub mod member_repository;

pub use item_repository::*;
pub use market_store::*;
pub use member_repository::*;
