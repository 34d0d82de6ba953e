use crate::domain::member::Member;
use crate::domain::value_objects::MemberId;
use crate::ports::member_repository::{MemberRepository as MemberRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of MemberRepository
///
/// Member management (registration, credentials) lives outside this context;
/// this adapter only reads the members table.
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Create a new MemberRepository with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Member {
            member_id: MemberId::from_i64(row.get("member_id")),
            name: row.get("name"),
        }))
    }
}
