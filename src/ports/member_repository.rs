use crate::domain::member::Member;
use crate::domain::value_objects::MemberId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員リポジトリポート
///
/// 購入コンテキストと会員コンテキストの境界を維持する。
/// 会員の作成・更新は会員管理フローの責務であり、ここでは検索のみを提供する。
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// IDで会員を検索する
    ///
    /// 出品・購入前の会員バリデーションに使用される。
    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>>;
}
