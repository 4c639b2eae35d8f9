use std::sync::Arc;

use axum::{extract::State, response::Response};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::categories::category_response::CategoryResponse,
};

/// Active categories in display order.
pub async fn list_categories_route(State(state): State<Arc<AppState>>) -> Response {
    let categories: Vec<CategoryResponse> = state
        .store
        .list_active_categories()
        .await
        .into_iter()
        .map(CategoryResponse::from)
        .collect();

    debug!(count = categories.len(), "list_categories_route: done");
    ApiResponse::ok(categories)
}
