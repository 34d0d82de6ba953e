use crate::domain::item::{Item, NewItem};
use crate::domain::value_objects::{ItemId, MemberId, Quantity};
use crate::ports::item_repository::{
    ItemDetail, ItemRepository as ItemRepositoryTrait, ItemSummary, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データのquantity列をQuantityに変換する
///
/// CHECK制約により負数は保存されないはずだが、
/// 型レベルの不変条件に乗せる境界でエラーハンドリングを行う。
pub(super) fn map_quantity(raw: i64) -> Result<Quantity> {
    Quantity::try_from(raw).map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("quantity out of range: {}", raw),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

/// PostgreSQLの行データをItemに変換する
pub(super) fn map_row_to_item(row: &PgRow) -> Result<Item> {
    Ok(Item {
        item_id: ItemId::from_i64(row.get("item_id")),
        seller_id: MemberId::from_i64(row.get("seller_id")),
        name: row.get("name"),
        price: row.get("price"),
        quantity: map_quantity(row.get("quantity"))?,
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

/// PostgreSQLの出品者結合行をItemSummaryに変換する
fn map_row_to_item_summary(row: &PgRow) -> Result<ItemSummary> {
    Ok(ItemSummary {
        item_id: ItemId::from_i64(row.get("item_id")),
        name: row.get("name"),
        price: row.get("price"),
        quantity: map_quantity(row.get("quantity"))?,
        seller_name: row.get("seller_name"),
    })
}

/// ItemRepositoryのPostgreSQL実装
///
/// 一覧と詳細は出品者を結合した1回のクエリで取得する。
/// 暗黙の遅延ロードによるN+1クエリを避けるため、結合は常に明示的。
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// PostgreSQLコネクションプールから新しいItemRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    /// 新しい商品を永続化する
    ///
    /// item_idとcreated_atはデータベースで採番され、
    /// RETURNINGで完全な行を受け取る。
    async fn insert(&self, item: NewItem) -> Result<Item> {
        let row = sqlx::query(
            r#"
            INSERT INTO items (seller_id, name, price, quantity, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING item_id, seller_id, name, price, quantity, description, created_at
            "#,
        )
        .bind(item.seller_id.value())
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity.value())
        .bind(&item.description)
        .fetch_one(&self.pool)
        .await?;

        map_row_to_item(&row)
    }

    /// すべての商品を出品者名付きで取得する（新しい出品順）
    async fn list_all(&self) -> Result<Vec<ItemSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT
                i.item_id,
                i.name,
                i.price,
                i.quantity,
                m.name AS seller_name
            FROM items i
            JOIN members m ON m.member_id = i.seller_id
            ORDER BY i.created_at DESC, i.item_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_item_summary).collect()
    }

    /// IDで商品を出品者情報付きで検索する
    async fn find_detail(&self, item_id: ItemId) -> Result<Option<ItemDetail>> {
        let row = sqlx::query(
            r#"
            SELECT
                i.item_id,
                i.name,
                i.price,
                i.quantity,
                i.description,
                i.created_at,
                m.member_id AS seller_id,
                m.name AS seller_name
            FROM items i
            JOIN members m ON m.member_id = i.seller_id
            WHERE i.item_id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(ItemDetail {
                item_id: ItemId::from_i64(row.get("item_id")),
                name: row.get("name"),
                price: row.get("price"),
                quantity: map_quantity(row.get("quantity"))?,
                description: row.get("description"),
                seller_id: MemberId::from_i64(row.get("seller_id")),
                seller_name: row.get("seller_name"),
                created_at: row.get("created_at"),
            })
        })
        .transpose()
    }
}
