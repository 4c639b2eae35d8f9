use axum::http::HeaderMap;

pub mod categories;
pub mod chat;
pub mod detection;
pub mod feedback;
pub mod health;
pub mod history;

/// `X-Request-Id` of the incoming request, or `-`.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
