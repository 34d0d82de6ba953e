use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemId, MemberId, PurchaseItemError, Quantity, StockError, TransactionDraft};

/// 商品 - 出品された販売物
///
/// 不変条件：
/// - quantityは常に0以上（Quantity型で強制）
/// - quantityの減算は購入ワークフローからのみ行われる
/// - 商品は本コンテキストでは削除されない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub seller_id: MemberId,
    pub name: String,
    pub price: i64,
    pub quantity: Quantity,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// 商品の登録内容 - 永続化前の商品
///
/// IDと作成日時はストレージ層で採番される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub seller_id: MemberId,
    pub name: String,
    pub price: i64,
    pub quantity: Quantity,
    pub description: String,
}

/// 商品を購入する（純粋な関数）
///
/// 在庫を1つ減らし、購入時点の価格を写し取った取引履歴ドラフトを生成する。
/// 確定フラグ（出品者側・購入者側）はどちらもfalseで初期化される。
///
/// 二重購入の確認と永続化はアプリケーション層の責務。
/// この関数は在庫の不変条件のみを扱う。
///
/// # 戻り値
/// 在庫を減らした商品と、取引履歴ドラフトのペア
///
/// # エラー
/// 在庫が0の場合は`PurchaseItemError::OutOfStock`を返す
pub fn purchase(
    item: Item,
    buyer_id: MemberId,
) -> Result<(Item, TransactionDraft), PurchaseItemError> {
    let quantity = item.quantity.decrement().map_err(|e| match e {
        StockError::OutOfStock | StockError::Negative => PurchaseItemError::OutOfStock,
    })?;

    let draft = TransactionDraft {
        member_id: buyer_id,
        item_id: item.item_id,
        purchase_price: item.price,
        sale_confirmed: false,
        purchase_confirmed: false,
    };

    Ok((
        Item {
            quantity,
            ..item
        },
        draft,
    ))
}
