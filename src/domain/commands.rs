use serde::{Deserialize, Serialize};

use super::{ItemId, MemberId, Quantity};

/// コマンド：商品を出品する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterItem {
    pub seller_id: MemberId,
    pub name: String,
    pub price: i64,
    pub quantity: Quantity,
    pub description: String,
}

/// コマンド：商品を購入する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub buyer_id: MemberId,
    pub item_id: ItemId,
}
