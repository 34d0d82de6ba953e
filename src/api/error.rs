use crate::application::item::ItemApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// エラーの種類ごとに安定した機械可読コードを持つ。
#[derive(Debug)]
pub enum ApiError {
    /// アプリケーション層のエラー
    Application(ItemApplicationError),
    /// リクエストのバリデーションエラー
    BadRequest(String),
}

impl From<ItemApplicationError> for ApiError {
    fn from(err: ItemApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            // 400 Bad Request - リクエストそのものが不正
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            // 404 Not Found - リクエストされたリソースが存在しない
            ApiError::Application(ItemApplicationError::ItemNotFound) => (
                StatusCode::NOT_FOUND,
                "ITEM_NOT_FOUND",
                "Item not found".to_string(),
            ),

            // 422 Unprocessable Entity - ビジネスルール違反
            ApiError::Application(ItemApplicationError::MemberNotFound) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MEMBER_NOT_FOUND",
                "Member not found".to_string(),
            ),
            ApiError::Application(ItemApplicationError::AlreadyPurchased) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ALREADY_PURCHASED",
                "Item already purchased by this member".to_string(),
            ),
            ApiError::Application(ItemApplicationError::InsufficientStock) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_STOCK",
                "Item is out of stock".to_string(),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::Application(ItemApplicationError::StoreError(ref e)) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_code, message));
        (status, body).into_response()
    }
}
