use crate::domain::item::Item;
use crate::domain::member::Member;
use crate::domain::transaction_history::{TransactionDraft, TransactionHistory};
use crate::domain::value_objects::{ItemId, MemberId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 購入トランザクションポート
///
/// 購入ワークフローの確認・減算・記録の一連をひとつの
/// ストレージトランザクションとして実行するための境界。
/// アノテーション駆動のトランザクション境界の代わりに、
/// 明示的なスコープ付きトランザクションとして表現する。
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// 新しいトランザクションを開始する
    ///
    /// 返されたトランザクションをcommitせずにdropした場合、
    /// すべての変更はロールバックされる。
    async fn begin(&self) -> Result<Box<dyn PurchaseTx>>;
}

/// 購入ワークフローのトランザクション
///
/// 一貫性保証：すべての読み取りと書き込みは同一トランザクション内で
/// 実行される。在庫確認に使った読み取りと減算は同じ商品行に対して行われ、
/// 部分的な適用（減算だけ、記録だけ）が他の操作から観測されることはない。
#[async_trait]
pub trait PurchaseTx: Send {
    /// IDで会員を検索する
    async fn find_member_by_id(&mut self, member_id: MemberId) -> Result<Option<Member>>;

    /// IDで商品を検索し、コミットまで行をロックする
    ///
    /// 同じ商品への並行購入はこのロックで直列化される。
    /// 在庫1に対する2人の同時購入者が両方とも在庫確認を通過し、
    /// 在庫を-1にしてしまう競合を防ぐ。
    async fn find_item_for_update(&mut self, item_id: ItemId) -> Result<Option<Item>>;

    /// (会員, 商品)の取引履歴が既に存在するか確認する
    ///
    /// 1会員1商品1購入のルールの強制に使用される。
    async fn exists_transaction(&mut self, member_id: MemberId, item_id: ItemId) -> Result<bool>;

    /// 商品の変更（在庫の減算）を保存する
    async fn save_item(&mut self, item: &Item) -> Result<()>;

    /// 取引履歴を保存する
    ///
    /// IDと作成日時はストレージ層で採番される。
    async fn save_transaction(&mut self, draft: TransactionDraft) -> Result<TransactionHistory>;

    /// トランザクションをコミットする
    async fn commit(self: Box<Self>) -> Result<()>;
}
