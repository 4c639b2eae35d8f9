//! Direct access to the detection pipeline. These endpoints never fail on
//! model or store problems; they answer with the documented fallback values.

use std::sync::Arc;

use axum::{Json, extract::State, response::Response};
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::detection::{
        detection_request::{ConfidenceRequest, DetectCategoryRequest, KeywordsRequest},
        detection_response::{ConfidenceResponse, DetectCategoryResponse, KeywordsResponse},
    },
};

pub async fn detect_category_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DetectCategoryRequest>,
) -> Response {
    let attempts = body.attempts(state.detector.config());
    let result = state
        .detector
        .detect_category_with_retry(&body.message, attempts, &state.shutdown)
        .await;

    debug!(attempts, ?result, "detect_category_route: done");
    ApiResponse::ok(DetectCategoryResponse::from(result))
}

pub async fn confidence_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConfidenceRequest>,
) -> Response {
    let score = state
        .detector
        .evaluate_confidence(&body.message, body.category_id)
        .await;

    ApiResponse::ok(ConfidenceResponse {
        category_id: body.category_id,
        score: score.value(),
    })
}

pub async fn keywords_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<KeywordsRequest>,
) -> Response {
    let keywords = state.detector.extract_keywords(&body.message).await;
    ApiResponse::ok(KeywordsResponse { keywords })
}
