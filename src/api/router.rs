use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, get_item_detail, list_items, purchase_item, register_item};

/// Creates the API router with all marketplace endpoints
///
/// Command endpoints (Write operations):
/// - POST /items - Register an item for sale
/// - POST /items/:id/purchase - Purchase an item
///
/// Query endpoints (Read operations):
/// - GET /items - List all items
/// - GET /items/:id - Get item details with seller
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/items", post(register_item))
        .route("/items/:id/purchase", post(purchase_item))
        // Query endpoints (Read operations)
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item_detail))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
