//! JSON envelope returned by every smart-search endpoint.
//!
//! Success: `{ "success": true, "data": ... }`.
//! Failure: `{ "success": false, "error": { "code", "message", "details"? } }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `200 OK` with `data`.
    pub fn ok(data: T) -> Response {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn with_status(status: StatusCode, data: T) -> Response {
        let envelope = Self {
            success: true,
            data: Some(data),
            error: None,
        };
        (status, Json(envelope)).into_response()
    }
}

impl ApiResponse<()> {
    pub fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Stable, machine-readable code (e.g. `CATEGORY_NOT_DETECTED`).
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<ApiErrorDetail>) -> Self {
        self.details = details;
        self
    }

    /// Wraps the error in a failure envelope with `status`.
    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(ApiResponse::failure(self))).into_response()
    }
}

/// Per-field problem, e.g. `{ "path": "rating", "hint": "must be between 1 and 5" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorDetail {
    pub fn field(path: &str, hint: impl Into<String>) -> Self {
        Self {
            path: Some(path.to_string()),
            hint: Some(hint.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_data_and_empty_details() {
        let env = ApiResponse::failure(ApiError::new("LLM_FAILED", "upstream down"));
        assert_eq!(
            serde_json::to_value(env).unwrap(),
            json!({ "success": false, "error": { "code": "LLM_FAILED", "message": "upstream down" } })
        );
    }

    #[test]
    fn details_are_listed_when_present() {
        let err = ApiError::new("VALIDATION_ERROR", "bad")
            .with_details(vec![ApiErrorDetail::field("rating", "1-5")]);
        let v = serde_json::to_value(ApiResponse::failure(err)).unwrap();
        assert_eq!(v["error"]["details"][0], json!({ "path": "rating", "hint": "1-5" }));
    }
}
