use chrono::Utc;
use rusty_market_ddd::application::item::{
    ItemApplicationError, ServiceDependencies, get_item_detail, list_items, purchase_item,
    register_item,
};
use rusty_market_ddd::domain::commands::*;
use rusty_market_ddd::domain::item::{Item, NewItem};
use rusty_market_ddd::domain::member::Member;
use rusty_market_ddd::domain::transaction_history::{TransactionDraft, TransactionHistory};
use rusty_market_ddd::domain::value_objects::*;
use rusty_market_ddd::ports::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

// ============================================================================
// インメモリモック実装（テスト用）
// ============================================================================

/// インメモリストアの共有状態
struct InMemoryState {
    members: HashMap<i64, Member>,
    items: HashMap<i64, Item>,
    histories: Vec<TransactionHistory>,
    next_item_id: i64,
    next_transaction_id: i64,
}

impl InMemoryState {
    fn new() -> Self {
        Self {
            members: HashMap::new(),
            items: HashMap::new(),
            histories: Vec::new(),
            next_item_id: 1,
            next_transaction_id: 1,
        }
    }
}

/// インメモリのストア実装
///
/// 3つのポートすべてをひとつの状態の上に実装する。
/// MarketStore::beginはMutexガードをトランザクションの寿命の間保持し、
/// PostgreSQLの行ロック（SELECT ... FOR UPDATE）による直列化をモデル化する。
struct InMemoryMarket {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryMarket {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState::new())),
        }
    }

    async fn seed_member(&self, id: i64, name: &str) -> MemberId {
        let member_id = MemberId::from_i64(id);
        self.state.lock().await.members.insert(
            id,
            Member {
                member_id,
                name: name.to_string(),
            },
        );
        member_id
    }

    async fn seed_item(&self, seller_id: MemberId, price: i64, quantity: i64) -> ItemId {
        let mut state = self.state.lock().await;
        let id = state.next_item_id;
        state.next_item_id += 1;
        let item_id = ItemId::from_i64(id);
        state.items.insert(
            id,
            Item {
                item_id,
                seller_id,
                name: format!("item-{}", id),
                price,
                quantity: Quantity::try_from(quantity).unwrap(),
                description: "test item".to_string(),
                created_at: Utc::now(),
            },
        );
        item_id
    }

    async fn item_quantity(&self, item_id: ItemId) -> i64 {
        self.state.lock().await.items[&item_id.value()]
            .quantity
            .value()
    }

    async fn history_count(&self) -> usize {
        self.state.lock().await.histories.len()
    }
}

#[async_trait::async_trait]
impl MemberRepository for InMemoryMarket {
    async fn find_by_id(&self, member_id: MemberId) -> member_repository::Result<Option<Member>> {
        let state = self.state.lock().await;
        Ok(state.members.get(&member_id.value()).cloned())
    }
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryMarket {
    async fn insert(&self, item: NewItem) -> item_repository::Result<Item> {
        let mut state = self.state.lock().await;
        let id = state.next_item_id;
        state.next_item_id += 1;
        let persisted = Item {
            item_id: ItemId::from_i64(id),
            seller_id: item.seller_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            description: item.description,
            created_at: Utc::now(),
        };
        state.items.insert(id, persisted.clone());
        Ok(persisted)
    }

    async fn list_all(&self) -> item_repository::Result<Vec<ItemSummary>> {
        let state = self.state.lock().await;
        let mut items: Vec<&Item> = state.items.values().collect();
        // 新しい出品順（採番IDの降順）
        items.sort_by(|a, b| b.item_id.value().cmp(&a.item_id.value()));
        Ok(items
            .into_iter()
            .map(|item| ItemSummary {
                item_id: item.item_id,
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
                seller_name: state.members[&item.seller_id.value()].name.clone(),
            })
            .collect())
    }

    async fn find_detail(&self, item_id: ItemId) -> item_repository::Result<Option<ItemDetail>> {
        let state = self.state.lock().await;
        Ok(state.items.get(&item_id.value()).map(|item| {
            let seller = &state.members[&item.seller_id.value()];
            ItemDetail {
                item_id: item.item_id,
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
                description: item.description.clone(),
                seller_id: seller.member_id,
                seller_name: seller.name.clone(),
                created_at: item.created_at,
            }
        }))
    }
}

/// インメモリの購入トランザクション
///
/// ガードを保持している間、他のトランザクションは開始できない。
/// 書き込みはステージングし、commitで初めて共有状態に適用する。
/// commitせずにdropされた場合、ステージング分は破棄される（ロールバック）。
struct InMemoryPurchaseTx {
    guard: OwnedMutexGuard<InMemoryState>,
    staged_item: Option<Item>,
    staged_history: Option<TransactionHistory>,
}

#[async_trait::async_trait]
impl MarketStore for InMemoryMarket {
    async fn begin(&self) -> market_store::Result<Box<dyn PurchaseTx>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(InMemoryPurchaseTx {
            guard,
            staged_item: None,
            staged_history: None,
        }))
    }
}

#[async_trait::async_trait]
impl PurchaseTx for InMemoryPurchaseTx {
    async fn find_member_by_id(
        &mut self,
        member_id: MemberId,
    ) -> market_store::Result<Option<Member>> {
        Ok(self.guard.members.get(&member_id.value()).cloned())
    }

    async fn find_item_for_update(
        &mut self,
        item_id: ItemId,
    ) -> market_store::Result<Option<Item>> {
        Ok(self.guard.items.get(&item_id.value()).cloned())
    }

    async fn exists_transaction(
        &mut self,
        member_id: MemberId,
        item_id: ItemId,
    ) -> market_store::Result<bool> {
        Ok(self
            .guard
            .histories
            .iter()
            .any(|h| h.member_id == member_id && h.item_id == item_id))
    }

    async fn save_item(&mut self, item: &Item) -> market_store::Result<()> {
        self.staged_item = Some(item.clone());
        Ok(())
    }

    async fn save_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> market_store::Result<TransactionHistory> {
        // シーケンスと同様、ロールバックされてもIDは戻らない
        let id = self.guard.next_transaction_id;
        self.guard.next_transaction_id += 1;
        let history = TransactionHistory {
            transaction_id: TransactionId::from_i64(id),
            member_id: draft.member_id,
            item_id: draft.item_id,
            purchase_price: draft.purchase_price,
            sale_confirmed: draft.sale_confirmed,
            purchase_confirmed: draft.purchase_confirmed,
            created_at: Utc::now(),
        };
        self.staged_history = Some(history.clone());
        Ok(history)
    }

    async fn commit(mut self: Box<Self>) -> market_store::Result<()> {
        if let Some(item) = self.staged_item.take() {
            self.guard.items.insert(item.item_id.value(), item);
        }
        if let Some(history) = self.staged_history.take() {
            self.guard.histories.push(history);
        }
        Ok(())
    }
}

/// テスト用の依存関係を構築する
fn deps(store: &Arc<InMemoryMarket>) -> ServiceDependencies {
    ServiceDependencies {
        member_repository: store.clone(),
        item_repository: store.clone(),
        market_store: store.clone(),
    }
}

// ============================================================================
// 出品のテスト
// ============================================================================

#[tokio::test]
async fn test_register_item_success() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let deps = deps(&store);

    let cmd = RegisterItem {
        seller_id,
        name: "中古キーボード".to_string(),
        price: 1000,
        quantity: Quantity::try_from(5).unwrap(),
        description: "ほぼ新品".to_string(),
    };

    let item = register_item(&deps, cmd).await.unwrap();

    assert_eq!(item.seller_id, seller_id);
    assert_eq!(item.price, 1000);
    assert_eq!(item.quantity.value(), 5);

    // 永続化されていることを確認
    let detail = get_item_detail(&deps, item.item_id).await.unwrap();
    assert_eq!(detail.seller_name, "山田");
}

#[tokio::test]
async fn test_register_item_fails_for_unknown_seller() {
    let store = Arc::new(InMemoryMarket::new());
    let deps = deps(&store);

    let cmd = RegisterItem {
        seller_id: MemberId::from_i64(999),
        name: "中古キーボード".to_string(),
        price: 1000,
        quantity: Quantity::try_from(5).unwrap(),
        description: "ほぼ新品".to_string(),
    };

    let result = register_item(&deps, cmd).await;

    assert!(matches!(
        result.unwrap_err(),
        ItemApplicationError::MemberNotFound
    ));

    // 何も書き込まれていないことを確認
    let items = list_items(&deps).await.unwrap();
    assert!(items.is_empty());
}

// ============================================================================
// 一覧・詳細のテスト
// ============================================================================

#[tokio::test]
async fn test_list_items_returns_all_with_seller_name_newest_first() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let first = store.seed_item(seller_id, 1000, 3).await;
    let second = store.seed_item(seller_id, 2000, 1).await;
    let deps = deps(&store);

    let items = list_items(&deps).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_id, second);
    assert_eq!(items[1].item_id, first);
    assert_eq!(items[0].seller_name, "山田");
}

#[tokio::test]
async fn test_get_item_detail_resolves_seller() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let item_id = store.seed_item(seller_id, 1500, 2).await;
    let deps = deps(&store);

    let detail = get_item_detail(&deps, item_id).await.unwrap();

    assert_eq!(detail.item_id, item_id);
    assert_eq!(detail.price, 1500);
    assert_eq!(detail.seller_id, seller_id);
    assert_eq!(detail.seller_name, "山田");
}

#[tokio::test]
async fn test_get_item_detail_fails_for_unknown_item() {
    let store = Arc::new(InMemoryMarket::new());
    let deps = deps(&store);

    let result = get_item_detail(&deps, ItemId::from_i64(999)).await;

    assert!(matches!(
        result.unwrap_err(),
        ItemApplicationError::ItemNotFound
    ));
}

// ============================================================================
// 購入のテスト
// ============================================================================

#[tokio::test]
async fn test_purchase_item_success() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let buyer_id = store.seed_member(2, "佐藤").await;
    let item_id = store.seed_item(seller_id, 1000, 3).await;
    let deps = deps(&store);

    let history = purchase_item(
        &deps,
        PurchaseItem {
            buyer_id,
            item_id,
        },
    )
    .await
    .unwrap();

    // 購入時点の価格が写し取られ、確定フラグはどちらもfalse
    assert_eq!(history.purchase_price, 1000);
    assert!(!history.sale_confirmed);
    assert!(!history.purchase_confirmed);
    assert_eq!(history.member_id, buyer_id);
    assert_eq!(history.item_id, item_id);

    // 在庫が1つ減り、取引履歴が1件だけ記録される
    assert_eq!(store.item_quantity(item_id).await, 2);
    assert_eq!(store.history_count().await, 1);
}

#[tokio::test]
async fn test_purchase_item_fails_for_unknown_member() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let item_id = store.seed_item(seller_id, 1000, 3).await;
    let deps = deps(&store);

    let result = purchase_item(
        &deps,
        PurchaseItem {
            buyer_id: MemberId::from_i64(999),
            item_id,
        },
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        ItemApplicationError::MemberNotFound
    ));

    // 何も書き込まれていないことを確認
    assert_eq!(store.item_quantity(item_id).await, 3);
    assert_eq!(store.history_count().await, 0);
}

#[tokio::test]
async fn test_purchase_item_fails_for_unknown_item_repeatedly() {
    let store = Arc::new(InMemoryMarket::new());
    let buyer_id = store.seed_member(1, "佐藤").await;
    let deps = deps(&store);

    let cmd = PurchaseItem {
        buyer_id,
        item_id: ItemId::from_i64(999),
    };

    // 失敗の冪等性：何度繰り返しても同じエラーで、状態は変わらない
    for _ in 0..3 {
        let result = purchase_item(&deps, cmd).await;
        assert!(matches!(
            result.unwrap_err(),
            ItemApplicationError::ItemNotFound
        ));
        assert_eq!(store.history_count().await, 0);
    }
}

#[tokio::test]
async fn test_purchase_item_fails_when_already_purchased() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let buyer_id = store.seed_member(2, "佐藤").await;
    let item_id = store.seed_item(seller_id, 1000, 3).await;
    let deps = deps(&store);

    let cmd = PurchaseItem {
        buyer_id,
        item_id,
    };

    purchase_item(&deps, cmd).await.unwrap();
    let result = purchase_item(&deps, cmd).await;

    assert!(matches!(
        result.unwrap_err(),
        ItemApplicationError::AlreadyPurchased
    ));

    // 2回目の失敗で在庫も履歴も変わらない
    assert_eq!(store.item_quantity(item_id).await, 2);
    assert_eq!(store.history_count().await, 1);
}

#[tokio::test]
async fn test_purchase_item_fails_when_out_of_stock() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let buyer_id = store.seed_member(2, "佐藤").await;
    let item_id = store.seed_item(seller_id, 1000, 0).await;
    let deps = deps(&store);

    // 購入履歴がなくても在庫0なら失敗する
    let result = purchase_item(
        &deps,
        PurchaseItem {
            buyer_id,
            item_id,
        },
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        ItemApplicationError::InsufficientStock
    ));

    // 在庫は0のまま（負数にならない）
    assert_eq!(store.item_quantity(item_id).await, 0);
    assert_eq!(store.history_count().await, 0);
}

#[tokio::test]
async fn test_purchase_price_survives_later_price_change() {
    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let buyer_id = store.seed_member(2, "佐藤").await;
    let item_id = store.seed_item(seller_id, 1000, 3).await;
    let deps = deps(&store);

    let history = purchase_item(
        &deps,
        PurchaseItem {
            buyer_id,
            item_id,
        },
    )
    .await
    .unwrap();

    // 購入後に商品価格が変更されても、記録された取引価格は変わらない
    store
        .state
        .lock()
        .await
        .items
        .get_mut(&item_id.value())
        .unwrap()
        .price = 9999;

    let recorded = store.state.lock().await.histories[0].clone();
    assert_eq!(recorded.transaction_id, history.transaction_id);
    assert_eq!(recorded.purchase_price, 1000);
}

// ============================================================================
// 並行性のテスト
// ============================================================================

/// 在庫1の商品へのN人の同時購入：
/// ちょうど1人だけが成功し、残りは在庫不足（または購入済み）で失敗する。
/// 最終在庫は0で、決して負数にならない。
#[tokio::test]
async fn test_concurrent_purchasers_never_oversell() {
    const PURCHASERS: i64 = 8;

    let store = Arc::new(InMemoryMarket::new());
    let seller_id = store.seed_member(1, "山田").await;
    let item_id = store.seed_item(seller_id, 1000, 1).await;

    let mut buyer_ids = Vec::new();
    for i in 0..PURCHASERS {
        buyer_ids.push(store.seed_member(100 + i, &format!("buyer-{}", i)).await);
    }

    let mut handles = Vec::new();
    for buyer_id in buyer_ids {
        let deps = deps(&store);
        handles.push(tokio::spawn(async move {
            purchase_item(
                &deps,
                PurchaseItem {
                    buyer_id,
                    item_id,
                },
            )
            .await
        }));
    }

    let mut successes = 0;
    let mut failures = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(
                ItemApplicationError::InsufficientStock | ItemApplicationError::AlreadyPurchased,
            ) => failures += 1,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(failures, PURCHASERS - 1);
    assert_eq!(store.item_quantity(item_id).await, 0);
    assert_eq!(store.history_count().await, 1);
}
