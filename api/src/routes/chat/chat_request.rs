use category_detection::CategoryId;
use serde::Deserialize;

use crate::error_handler::{AppError, AppResult};

pub const MESSAGE_MAX_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omit to let the service detect the category from the message.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub message: String,
    pub user_id: String,
    /// Continue an existing conversation; a new id is issued when absent.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.message.trim().is_empty() {
            return Err(AppError::invalid_field("message", "must not be blank"));
        }
        if self.message.chars().count() > MESSAGE_MAX_CHARS {
            return Err(AppError::invalid_field(
                "message",
                format!("must be at most {MESSAGE_MAX_CHARS} characters"),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(AppError::invalid_field("user_id", "must not be blank"));
        }
        Ok(())
    }

    /// The supplied session id, if it is not blank.
    pub fn existing_session(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
