use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::{
        feedback::feedback_request::{FeedbackRequest, FeedbackResponse},
        request_id,
    },
};

pub async fn feedback_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<FeedbackRequest>,
) -> AppResult<Response> {
    let feedback = body.into_new_feedback()?;
    let stored = state.store.insert_feedback(feedback).await;

    info!(
        request_id = %request_id(&headers),
        session_id = %stored.session_id,
        rating = stored.rating,
        "feedback saved"
    );
    Ok(ApiResponse::with_status(StatusCode::CREATED, FeedbackResponse::from(stored)))
}
