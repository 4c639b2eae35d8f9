//! Rows kept by the store and the inputs used to create them.

use category_detection::{Category, CategoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat category as stored, including presentation fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<&CategoryRecord> for Category {
    fn from(r: &CategoryRecord) -> Self {
        Category::new(r.category_id, r.name.clone(), r.description.clone())
    }
}

/// Reference text injected into the answer prompt of a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    #[serde(default)]
    pub context_id: i64,
    pub category_id: CategoryId,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    User,
    Ai,
}

#[derive(Clone, Debug)]
pub struct NewChatMessage {
    pub session_id: String,
    pub user_id: String,
    pub category_id: CategoryId,
    pub message_type: MessageType,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatMessage {
    pub message_id: i64,
    pub session_id: String,
    pub user_id: String,
    pub category_id: CategoryId,
    pub message_type: MessageType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Session fields written on every exchange.
#[derive(Clone, Debug)]
pub struct SessionUpsert {
    pub session_id: String,
    pub user_id: String,
    pub category_id: CategoryId,
    pub category_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatSession {
    pub session_id: String,
    pub user_id: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

/// One line of a user's chat history: a session and its latest message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistorySummary {
    pub session_id: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
    pub message_count: usize,
}

#[derive(Clone, Debug)]
pub struct NewFeedback {
    pub session_id: String,
    pub user_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub message_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feedback {
    pub feedback_id: i64,
    pub session_id: String,
    pub user_id: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
