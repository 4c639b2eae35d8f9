//! Rewrites plain-text 400/422 bodies (axum extractor rejections) into the
//! JSON envelope. Responses that are already JSON pass through untouched.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::http::response_envelope::{ApiError, ApiErrorDetail, ApiResponse};

/// Request fields, longest first so `category_id` wins over `id`-like substrings.
const KNOWN_FIELDS: [&str; 9] = [
    "max_attempts",
    "category_id",
    "session_id",
    "message_id",
    "user_id",
    "message",
    "comment",
    "rating",
    "size",
];

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .iter()
        .find(|key| msg.contains(*key))
        .map(|key| key.to_string())
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("A required field is missing from the JSON body.".into())
    } else if msg.contains("invalid type") {
        Some("A field has the wrong JSON type (e.g. a string where a number is expected).".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"message\": \"...\" }).".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }

    let id = format!("req-{}", Uuid::new_v4().simple());
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", value);
    }
    id
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let req_id = ensure_request_id(&mut parts);
    debug!(request_id = %req_id, status = status.as_u16(), "mapping extractor rejection");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };

    let code = if status == StatusCode::BAD_REQUEST {
        "BAD_REQUEST"
    } else {
        "UNPROCESSABLE_ENTITY"
    };
    let envelope =
        ApiResponse::failure(ApiError::new(code, original.trim()).with_details(vec![detail]));

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_field_from_serde_message() {
        assert_eq!(
            guess_path_from_serde_msg("missing field `user_id` at line 1 column 20"),
            Some("user_id".into())
        );
        assert_eq!(
            guess_path_from_serde_msg("invalid type: string \"x\", expected i64 for category_id"),
            Some("category_id".into())
        );
        assert_eq!(guess_path_from_serde_msg("EOF while parsing"), None);
    }

    #[test]
    fn hints_cover_common_rejections() {
        assert!(hint_from_serde_msg("missing field `message`").is_some());
        assert!(hint_from_serde_msg("Expected request with `Content-Type: application/json`").is_some());
        assert!(hint_from_serde_msg("something else").is_none());
    }
}
