use crate::domain::item::Item;
use crate::domain::member::Member;
use crate::domain::transaction_history::{TransactionDraft, TransactionHistory};
use crate::domain::value_objects::{ItemId, MemberId, TransactionId};
use crate::ports::market_store::{MarketStore as MarketStoreTrait, PurchaseTx, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};

use super::item_repository::map_row_to_item;

/// PostgreSQL implementation of MarketStore
///
/// Wraps the purchase workflow's check-mutate-insert sequence in a single
/// database transaction. The item row is locked with SELECT ... FOR UPDATE
/// so concurrent purchasers of the same item serialize on the stock check
/// instead of relying on default transaction isolation alone.
pub struct MarketStore {
    pool: PgPool,
}

impl MarketStore {
    /// Create a new MarketStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketStoreTrait for MarketStore {
    async fn begin(&self) -> Result<Box<dyn PurchaseTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresPurchaseTx { tx }))
    }
}

/// A purchase transaction backed by a PostgreSQL transaction
///
/// Dropping this without committing rolls the transaction back
/// (sqlx rolls back on drop), which releases the row lock and
/// discards any partial writes.
pub struct PostgresPurchaseTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PurchaseTx for PostgresPurchaseTx {
    async fn find_member_by_id(&mut self, member_id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query(
            r#"
            SELECT member_id, name
            FROM members
            WHERE member_id = $1
            "#,
        )
        .bind(member_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(|row| Member {
            member_id: MemberId::from_i64(row.get("member_id")),
            name: row.get("name"),
        }))
    }

    /// Fetch the item row and hold a row-level lock until commit/rollback
    ///
    /// The same read feeds the duplicate-purchase check, the stock check and
    /// the decrement, so no other transaction can interleave between them.
    async fn find_item_for_update(&mut self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT item_id, seller_id, name, price, quantity, description, created_at
            FROM items
            WHERE item_id = $1
            FOR UPDATE
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(map_row_to_item).transpose()
    }

    async fn exists_transaction(&mut self, member_id: MemberId, item_id: ItemId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM transaction_histories
                WHERE member_id = $1 AND item_id = $2
            )
            "#,
        )
        .bind(member_id.value())
        .bind(item_id.value())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn save_item(&mut self, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE items
            SET quantity = $2
            WHERE item_id = $1
            "#,
        )
        .bind(item.item_id.value())
        .bind(item.quantity.value())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn save_transaction(&mut self, draft: TransactionDraft) -> Result<TransactionHistory> {
        let row = sqlx::query(
            r#"
            INSERT INTO transaction_histories (
                member_id,
                item_id,
                purchase_price,
                sale_confirmed,
                purchase_confirmed
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING transaction_id, created_at
            "#,
        )
        .bind(draft.member_id.value())
        .bind(draft.item_id.value())
        .bind(draft.purchase_price)
        .bind(draft.sale_confirmed)
        .bind(draft.purchase_confirmed)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(TransactionHistory {
            transaction_id: TransactionId::from_i64(row.get("transaction_id")),
            member_id: draft.member_id,
            item_id: draft.item_id,
            purchase_price: draft.purchase_price,
            sale_confirmed: draft.sale_confirmed,
            purchase_confirmed: draft.purchase_confirmed,
            created_at: row.get("created_at"),
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
