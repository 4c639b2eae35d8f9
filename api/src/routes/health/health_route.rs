use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every configured LLM profile answered, otherwise `degraded`.
    pub status: &'static str,
    pub llm: Vec<HealthStatus>,
}

pub async fn health_route(State(state): State<Arc<AppState>>) -> Response {
    let llm = match &state.llm {
        Some(profiles) => profiles.health_all().await,
        None => Vec::new(),
    };
    let status = if llm.iter().all(|h| h.ok) { "ok" } else { "degraded" };

    ApiResponse::ok(HealthResponse { status, llm })
}
