use serde::{Deserialize, Serialize};

use super::MemberId;

/// 会員 - 商品を出品・購入できるユーザー
///
/// 会員の登録・認証は会員管理コンテキストの責務。
/// 購入コンテキストでは存在確認と出品者名の表示にのみ使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
}
