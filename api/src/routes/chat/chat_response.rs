use category_detection::CategoryId;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub ai_message: String,
    pub category_id: CategoryId,
    /// True when the category was detected rather than supplied.
    pub auto_detected: bool,
    pub timestamp: DateTime<Utc>,
}
