use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use category_detection::CategoryId;
use smart_search_store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::{ApiError, ApiErrorDetail};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    // --- IO / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ApiErrorDetail>,
    },

    #[error("invalid category id: {0}")]
    InvalidCategory(CategoryId),

    #[error("could not determine a category for the message; please choose one")]
    CategoryNotDetected,

    #[error("language model call failed: {0}")]
    LlmFailed(String),
}

impl AppError {
    /// Validation failure on a single field.
    pub fn invalid_field(path: &str, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        AppError::Validation {
            message: format!("{path}: {hint}"),
            details: vec![ApiErrorDetail::field(path, hint)],
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            AppError::CategoryNotDetected => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LlmFailed(_) => StatusCode::BAD_GATEWAY,

            // startup-only
            AppError::Llm(_)
            | AppError::Store(_)
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidCategory(_) => "INVALID_CATEGORY",
            AppError::CategoryNotDetected => "CATEGORY_NOT_DETECTED",
            AppError::LlmFailed(_) => "LLM_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "request failed");
        }

        let message = self.to_string();
        let code = self.error_code();
        let details = match self {
            AppError::Validation { details, .. } => details,
            _ => Vec::new(),
        };
        ApiError::new(code, message).with_details(details).respond(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_and_codes() {
        let cases = [
            (AppError::InvalidCategory(9), StatusCode::BAD_REQUEST, "INVALID_CATEGORY"),
            (
                AppError::CategoryNotDetected,
                StatusCode::UNPROCESSABLE_ENTITY,
                "CATEGORY_NOT_DETECTED",
            ),
            (AppError::LlmFailed("timeout".into()), StatusCode::BAD_GATEWAY, "LLM_FAILED"),
            (
                AppError::invalid_field("message", "must not be blank"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn invalid_field_carries_detail() {
        let AppError::Validation { message, details } = AppError::invalid_field("rating", "1-5")
        else {
            panic!("expected validation error");
        };
        assert_eq!(message, "rating: 1-5");
        assert_eq!(details, vec![ApiErrorDetail::field("rating", "1-5")]);
    }
}
