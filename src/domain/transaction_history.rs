use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, MemberId, TransactionId};

/// 取引履歴 - 1回の購入の不変な記録
///
/// 不変条件：
/// - purchase_priceは購入時点の商品価格のコピー。
///   商品価格が後から変更されても過去の取引価格は変わらない（監査用）。
/// - (会員, 商品)の組み合わせごとに最大1件。購入ワークフローが強制する。
/// - 確定フラグの更新は本コンテキストの管轄外（作成後は読み取り専用）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHistory {
    pub transaction_id: TransactionId,
    pub member_id: MemberId,
    pub item_id: ItemId,
    pub purchase_price: i64,
    pub sale_confirmed: bool,
    pub purchase_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// 取引履歴のドラフト - 永続化前の取引記録
///
/// IDと作成日時はストレージ層で採番されるため、ドラフトには含まれない。
/// `domain::item::purchase`でのみ作成される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub member_id: MemberId,
    pub item_id: ItemId,
    pub purchase_price: i64,
    pub sale_confirmed: bool,
    pub purchase_confirmed: bool,
}
