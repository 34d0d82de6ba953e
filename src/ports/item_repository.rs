use crate::domain::item::{Item, NewItem};
use crate::domain::value_objects::{ItemId, MemberId, Quantity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 商品一覧用のビュー
///
/// 出品者名を含む非正規化ビュー。一覧表示のために
/// 出品者を結合した1回のクエリで取得する（N+1クエリの回避）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub name: String,
    pub price: i64,
    pub quantity: Quantity,
    pub seller_name: String,
}

/// 商品詳細用のビュー
///
/// 出品者のIDと名前を明示的に解決して返す。
/// 遅延ロードによる暗黙の追加クエリは行わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub item_id: ItemId,
    pub name: String,
    pub price: i64,
    pub quantity: Quantity,
    pub description: String,
    pub seller_id: MemberId,
    pub seller_name: String,
    pub created_at: DateTime<Utc>,
}

/// 商品リポジトリポート
///
/// 出品と読み取り専用の参照を提供する。
/// 在庫の減算はここではなく購入トランザクションポート（MarketStore）を通す。
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// 新しい商品を永続化する
    ///
    /// IDと作成日時はストレージ層で採番される。
    async fn insert(&self, item: NewItem) -> Result<Item>;

    /// すべての商品を出品者名付きで取得する
    ///
    /// フィルタリング・ページングなし。新しい出品順に返す。
    async fn list_all(&self) -> Result<Vec<ItemSummary>>;

    /// IDで商品を出品者情報付きで検索する
    async fn find_detail(&self, item_id: ItemId) -> Result<Option<ItemDetail>>;
}
