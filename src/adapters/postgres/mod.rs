pub mod item_repository;
pub mod market_store;
pub mod member_repository;

// パブリックに型を再エクスポート
pub use item_repository::ItemRepository as PostgresItemRepository;
pub use market_store::MarketStore as PostgresMarketStore;
pub use member_repository::MemberRepository as PostgresMemberRepository;
