use serde::{Deserialize, Serialize};

/// 会員ID - 会員管理コンテキストへの参照
///
/// 会員の作成・削除は本コンテキストの管轄外。
/// 購入コンテキストはMemberIDのみを知り、認証情報は知らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(i64);

impl MemberId {
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 商品ID - 出品された商品の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(i64);

impl ItemId {
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 取引履歴ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 在庫数エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// 在庫が0のため減らせない
    OutOfStock,
    /// 負の在庫数は作成できない
    Negative,
}

/// 在庫数
///
/// 不変条件：在庫数は常に0以上。
/// 型システムでこの制約を強制し、不正な値（負数）を作成できないようにする。
/// 在庫の減算は購入ワークフローからのみ行われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// 在庫を1つ減らす
    ///
    /// # エラー
    /// 在庫が0の場合は`StockError::OutOfStock`を返す
    pub fn decrement(self) -> Result<Self, StockError> {
        if self.0 == 0 {
            return Err(StockError::OutOfStock);
        }
        Ok(Self(self.0 - 1))
    }

    /// 在庫があるか
    pub fn is_in_stock(&self) -> bool {
        self.0 > 0
    }

    /// 現在の在庫数
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = StockError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(StockError::Negative);
        }
        Ok(Self(value))
    }
}
