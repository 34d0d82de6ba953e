use crate::application::item::{
    ServiceDependencies, get_item_detail as execute_get_item_detail,
    list_items as execute_list_items, purchase_item as execute_purchase_item,
    register_item as execute_register_item,
};
use crate::domain::value_objects::ItemId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        ItemDetailResponse, ItemPurchasedResponse, ItemRegisteredResponse, ItemSummaryResponse,
        PurchaseItemRequest, RegisterItemRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /items - 商品を出品
///
/// 強制されるビジネスルール:
/// - 出品者（会員）が存在すること
pub async fn register_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterItemRequest>,
) -> Result<(StatusCode, Json<ItemRegisteredResponse>), ApiError> {
    let cmd = req.to_command().map_err(ApiError::BadRequest)?;

    let item = execute_register_item(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(ItemRegisteredResponse::from(item))))
}

/// POST /items/:id/purchase - 商品を購入
///
/// 強制されるビジネスルール:
/// - 購入者（会員）が存在すること
/// - 商品が存在すること
/// - 同じ会員が同じ商品を2回購入できないこと
/// - 在庫が1以上であること
///
/// 確認・在庫減算・取引履歴の記録はひとつのトランザクションで実行される。
pub async fn purchase_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(req): Json<PurchaseItemRequest>,
) -> Result<(StatusCode, Json<ItemPurchasedResponse>), ApiError> {
    let cmd = req.to_command(item_id);

    let history = execute_purchase_item(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemPurchasedResponse::from(history)),
    ))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /items - 商品一覧取得
///
/// フィルタリング・ページングなし。すべての商品を出品者名付きで返す。
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemSummaryResponse>>, ApiError> {
    let items = execute_list_items(&state.service_deps).await?;

    Ok(Json(
        items.into_iter().map(ItemSummaryResponse::from).collect(),
    ))
}

/// GET /items/:id - 商品詳細をIDで取得
///
/// 見つかった場合は出品者情報付きの商品詳細を返し、
/// 見つからない場合は404を返す。
pub async fn get_item_detail(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<ItemDetailResponse>, ApiError> {
    let detail =
        execute_get_item_detail(&state.service_deps, ItemId::from_i64(item_id)).await?;

    Ok(Json(ItemDetailResponse::from(detail)))
}
