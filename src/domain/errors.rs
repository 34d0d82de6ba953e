/// 購入のドメインエラー
///
/// 二重購入・会員/商品の不存在はアプリケーション層で検出される。
/// ドメイン層が扱うのは在庫の不変条件のみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseItemError {
    /// 在庫切れ
    OutOfStock,
}
