//! HTTP layer of the smart-search service.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;

mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use category_detection::CancelToken;
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        categories::categories_route::list_categories_route,
        chat::chat_route::chat_route,
        detection::detection_route::{confidence_route, detect_category_route, keywords_route},
        feedback::feedback_route::feedback_route,
        health::health_route::health_route,
        history::history_route::history_route,
    },
};

pub const BASE_PATH: &str = "/api/v1/smart-search";
const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// All smart-search endpoints under [`BASE_PATH`].
pub fn build_router(state: Arc<AppState>) -> Router {
    let smart_search = Router::new()
        .route("/categories", get(list_categories_route))
        .route("/chat", post(chat_route))
        .route("/history", get(history_route))
        .route("/feedback", post(feedback_route))
        .route("/detect-category", post(detect_category_route))
        .route("/confidence", post(confidence_route))
        .route("/keywords", post(keywords_route))
        .route("/health", get(health_route));

    Router::new()
        .nest(BASE_PATH, smart_search)
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Builds state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env().await?);
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(|source| AppError::Bind {
            addr: host_url.clone(),
            source,
        })?;
    info!(address = %host_url, base_path = BASE_PATH, "smart-search API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C and cancels `token` so pending detection retries stop waiting.
async fn shutdown_signal(token: CancelToken) {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "failed to listen for Ctrl+C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
    token.cancel();
}
