use serde::{Deserialize, Serialize};

use crate::domain::commands::{PurchaseItem, RegisterItem};
use crate::domain::item::Item;
use crate::domain::transaction_history::TransactionHistory;
use crate::domain::value_objects::{ItemId, MemberId, Quantity};
use crate::ports::item_repository::{ItemDetail, ItemSummary};

/// 出品リクエスト（POST /items）
///
/// seller_idは認証層で解決済みの会員ID。
/// 認証・セッション解決は本コンテキストの管轄外。
#[derive(Debug, Deserialize)]
pub struct RegisterItemRequest {
    pub seller_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
}

impl RegisterItemRequest {
    /// リクエストをコマンドに変換する
    ///
    /// # エラー
    /// quantityが負数の場合はバリデーションエラー
    pub fn to_command(&self) -> Result<RegisterItem, String> {
        let quantity = Quantity::try_from(self.quantity)
            .map_err(|_| format!("quantity must be non-negative, got {}", self.quantity))?;

        Ok(RegisterItem {
            seller_id: MemberId::from_i64(self.seller_id),
            name: self.name.clone(),
            price: self.price,
            quantity,
            description: self.description.clone(),
        })
    }
}

/// 出品レスポンス（POST /items）
#[derive(Debug, Serialize)]
pub struct ItemRegisteredResponse {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl From<Item> for ItemRegisteredResponse {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.item_id.value(),
            name: item.name,
            price: item.price,
            quantity: item.quantity.value(),
        }
    }
}

/// 商品一覧レスポンス（GET /items）
#[derive(Debug, Serialize)]
pub struct ItemSummaryResponse {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub seller_name: String,
}

impl From<ItemSummary> for ItemSummaryResponse {
    fn from(summary: ItemSummary) -> Self {
        Self {
            item_id: summary.item_id.value(),
            name: summary.name,
            price: summary.price,
            quantity: summary.quantity.value(),
            seller_name: summary.seller_name,
        }
    }
}

/// 商品詳細レスポンス（GET /items/:id）
#[derive(Debug, Serialize)]
pub struct ItemDetailResponse {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
    pub seller_id: i64,
    pub seller_name: String,
}

impl From<ItemDetail> for ItemDetailResponse {
    fn from(detail: ItemDetail) -> Self {
        Self {
            item_id: detail.item_id.value(),
            name: detail.name,
            price: detail.price,
            quantity: detail.quantity.value(),
            description: detail.description,
            seller_id: detail.seller_id.value(),
            seller_name: detail.seller_name,
        }
    }
}

/// 購入リクエスト（POST /items/:id/purchase）
///
/// buyer_idは認証層で解決済みの会員ID。
#[derive(Debug, Deserialize)]
pub struct PurchaseItemRequest {
    pub buyer_id: i64,
}

impl PurchaseItemRequest {
    pub fn to_command(&self, item_id: i64) -> PurchaseItem {
        PurchaseItem {
            buyer_id: MemberId::from_i64(self.buyer_id),
            item_id: ItemId::from_i64(item_id),
        }
    }
}

/// 購入レスポンス（POST /items/:id/purchase）
#[derive(Debug, Serialize)]
pub struct ItemPurchasedResponse {
    pub transaction_id: i64,
    pub purchase_price: i64,
    pub sale_confirmed: bool,
    pub purchase_confirmed: bool,
}

impl From<TransactionHistory> for ItemPurchasedResponse {
    fn from(history: TransactionHistory) -> Self {
        Self {
            transaction_id: history.transaction_id.value(),
            purchase_price: history.purchase_price,
            sale_confirmed: history.sale_confirmed,
            purchase_confirmed: history.purchase_confirmed,
        }
    }
}

/// エラーレスポンス
///
/// errorは機械可読な安定コード、messageは人間向けの説明。
/// 境界層（クライアント）はerrorで分岐できる。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
