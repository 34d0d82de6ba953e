use crate::domain::{self, PurchaseItemError, TransactionHistory, commands::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{ItemApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// このパターンにより：
/// - すべての依存が明示的
/// - データと振る舞いの分離
/// - テストが明確
#[derive(Clone)]
pub struct ServiceDependencies {
    pub member_repository: Arc<dyn MemberRepository>,
    pub item_repository: Arc<dyn ItemRepository>,
    pub market_store: Arc<dyn MarketStore>,
}

/// 商品を出品する（純粋な関数）
///
/// ビジネスルール：
/// - 出品者（会員）が存在すること
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 出品コマンド
///
/// # 戻り値
/// 成功時は永続化された商品（ID採番済み）
pub async fn register_item(
    deps: &ServiceDependencies,
    cmd: RegisterItem,
) -> Result<domain::item::Item> {
    // 1. 出品者の存在確認
    let seller = deps
        .member_repository
        .find_by_id(cmd.seller_id)
        .await
        .map_err(ItemApplicationError::StoreError)?;

    if seller.is_none() {
        return Err(ItemApplicationError::MemberNotFound);
    }

    // 2. 商品を永続化
    let item = deps
        .item_repository
        .insert(domain::item::NewItem {
            seller_id: cmd.seller_id,
            name: cmd.name,
            price: cmd.price,
            quantity: cmd.quantity,
            description: cmd.description,
        })
        .await
        .map_err(ItemApplicationError::StoreError)?;

    Ok(item)
}

/// すべての商品を取得する（読み取り専用）
///
/// フィルタリング・ページングなし。出品者名付きのビューを新しい順に返す。
pub async fn list_items(deps: &ServiceDependencies) -> Result<Vec<ItemSummary>> {
    deps.item_repository
        .list_all()
        .await
        .map_err(ItemApplicationError::StoreError)
}

/// 商品詳細を取得する（読み取り専用）
///
/// 出品者のIDと名前を明示的に解決したビューを返す。
///
/// # エラー
/// 商品が存在しない場合は`ItemNotFound`
pub async fn get_item_detail(
    deps: &ServiceDependencies,
    item_id: crate::domain::ItemId,
) -> Result<ItemDetail> {
    deps.item_repository
        .find_detail(item_id)
        .await
        .map_err(ItemApplicationError::StoreError)?
        .ok_or(ItemApplicationError::ItemNotFound)
}

/// 商品を購入する（純粋な関数）
///
/// ビジネスルール（この順で確認し、それぞれ別のエラーで短絡する）：
/// 1. 購入者（会員）が存在すること → MemberNotFound
/// 2. 商品が存在すること → ItemNotFound
/// 3. (購入者, 商品)の取引履歴が存在しないこと → AlreadyPurchased
/// 4. 在庫が1以上であること → InsufficientStock
///
/// # 一貫性保証
///
/// 確認・減算・記録の一連はひとつのストレージトランザクションとして実行される。
/// 商品の読み取りは行ロック付きで行われ、同じ商品への並行購入は
/// ロックで直列化される。いずれかの事前条件が失敗した場合、
/// トランザクションはロールバックされ、部分的な書き込みは残らない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 購入コマンド
///
/// # 戻り値
/// 成功時は作成された取引履歴（ID採番済み、確定フラグはどちらもfalse）
pub async fn purchase_item(
    deps: &ServiceDependencies,
    cmd: PurchaseItem,
) -> Result<TransactionHistory> {
    let mut tx = deps
        .market_store
        .begin()
        .await
        .map_err(ItemApplicationError::StoreError)?;

    // 1. 購入者の存在確認
    let buyer = tx
        .find_member_by_id(cmd.buyer_id)
        .await
        .map_err(ItemApplicationError::StoreError)?;

    if buyer.is_none() {
        return Err(ItemApplicationError::MemberNotFound);
    }

    // 2. 商品の取得（コミットまで行ロック）
    let item = tx
        .find_item_for_update(cmd.item_id)
        .await
        .map_err(ItemApplicationError::StoreError)?
        .ok_or(ItemApplicationError::ItemNotFound)?;

    // 3. 二重購入の確認（1会員1商品1購入）
    let already_purchased = tx
        .exists_transaction(cmd.buyer_id, cmd.item_id)
        .await
        .map_err(ItemApplicationError::StoreError)?;

    if already_purchased {
        return Err(ItemApplicationError::AlreadyPurchased);
    }

    // 4. ドメイン層の純粋関数を呼び出し（在庫確認・減算・価格の写し取り）
    let (item, draft) = domain::item::purchase(item, cmd.buyer_id).map_err(|e| match e {
        PurchaseItemError::OutOfStock => ItemApplicationError::InsufficientStock,
    })?;

    // 5. 在庫の減算を保存
    tx.save_item(&item)
        .await
        .map_err(ItemApplicationError::StoreError)?;

    // 6. 取引履歴を保存
    let history = tx
        .save_transaction(draft)
        .await
        .map_err(ItemApplicationError::StoreError)?;

    // 7. コミット（ここまでのエラーの早期returnでtxがdropされ、ロールバックされる）
    tx.commit()
        .await
        .map_err(ItemApplicationError::StoreError)?;

    Ok(history)
}
