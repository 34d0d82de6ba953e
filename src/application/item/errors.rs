use thiserror::Error;

/// 商品アプリケーション層のエラー
///
/// MemberNotFound / ItemNotFound / AlreadyPurchased / InsufficientStockは
/// 呼び出し側の入力・状態に起因するエラーで、別の入力で再試行すれば回復できる。
/// StoreErrorはインフラ障害で、回復不能としてそのまま伝播させる（内部で再試行しない）。
#[derive(Debug, Error)]
pub enum ItemApplicationError {
    /// 会員が存在しない
    #[error("Member not found")]
    MemberNotFound,

    /// 商品が存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// この会員は既にこの商品を購入済み
    #[error("Item already purchased by this member")]
    AlreadyPurchased,

    /// 在庫不足
    #[error("Item is out of stock")]
    InsufficientStock,

    /// ストレージのエラー
    #[error("Store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ItemApplicationError>;
