use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        chat::{chat_request::ChatRequest, chat_service::process_chat},
        request_id,
    },
};

pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> AppResult<Response> {
    debug!(
        request_id = %request_id(&headers),
        category_id = ?body.category_id,
        "chat_route: start"
    );

    let response = process_chat(&state, body).await?;

    debug!(
        request_id = %request_id(&headers),
        session_id = %response.session_id,
        "chat_route: success"
    );
    Ok(ApiResponse::ok(response))
}
