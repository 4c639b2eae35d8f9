use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::history::history_query::HistoryQuery,
};

/// Chat sessions of a user, most recent first.
pub async fn history_route(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> AppResult<Response> {
    q.validate()?;
    let (offset, size) = q.window();

    let history = state
        .store
        .chat_history(&q.user_id, q.category_id, offset, size)
        .await;

    debug!(
        user_id = %q.user_id,
        offset,
        size,
        sessions = history.len(),
        "history_route: done"
    );
    Ok(ApiResponse::ok(history))
}
