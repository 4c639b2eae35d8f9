//! Async in-memory store guarded by a single `RwLock`.
//!
//! Each operation takes the lock once; there are no multi-operation
//! transactions. Ids are assigned from per-table counters starting at 1.

use std::collections::HashMap;
use std::path::Path;

use category_detection::CategoryId;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::{
    errors::{Result, StoreError},
    record::{
        CategoryRecord, ChatMessage, ChatSession, ContextEntry, Feedback, HistorySummary,
        NewChatMessage, NewFeedback, SessionUpsert,
    },
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    categories: HashMap<CategoryId, CategoryRecord>,
    context: Vec<ContextEntry>,
    messages: Vec<ChatMessage>,
    sessions: HashMap<String, SessionRow>,
    feedback: Vec<Feedback>,
    next_context_id: i64,
    next_message_id: i64,
    next_feedback_id: i64,
    /// Bumped on every session write; breaks ties between equal timestamps.
    write_seq: u64,
}

#[derive(Debug, Clone)]
struct SessionRow {
    session: ChatSession,
    seq: u64,
}

/// JSON layout accepted by [`MemoryStore::from_seed_file`].
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store preloaded with `seed`. Seed context ids are reassigned.
    pub fn from_seed(seed: Seed) -> Self {
        let mut state = State::default();
        for c in seed.categories {
            state.categories.insert(c.category_id, c);
        }
        for mut entry in seed.context {
            entry.context_id = next_id(&mut state.next_context_id);
            state.context.push(entry);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    /// Reads a JSON seed of the form `{ "categories": [...], "context": [...] }`.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let seed: Seed = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            categories = seed.categories.len(),
            context = seed.context.len(),
            "store seeded"
        );
        Ok(Self::from_seed(seed))
    }

    /// Inserts or replaces a category.
    pub async fn add_category(&self, category: CategoryRecord) {
        let mut state = self.state.write().await;
        state.categories.insert(category.category_id, category);
    }

    pub async fn add_context(&self, category_id: CategoryId, content: impl Into<String>) -> ContextEntry {
        let mut state = self.state.write().await;
        let entry = ContextEntry {
            context_id: next_id(&mut state.next_context_id),
            category_id,
            content: content.into(),
        };
        state.context.push(entry.clone());
        entry
    }

    /// Active categories ordered by `sort_order`, then id.
    pub async fn list_active_categories(&self) -> Vec<CategoryRecord> {
        let state = self.state.read().await;
        let mut out: Vec<CategoryRecord> = state
            .categories
            .values()
            .filter(|c| c.active)
            .cloned()
            .collect();
        out.sort_by_key(|c| (c.sort_order, c.category_id));
        out
    }

    /// An active category; inactive ones are treated as absent.
    pub async fn category_by_id(&self, id: CategoryId) -> Option<CategoryRecord> {
        let state = self.state.read().await;
        state.categories.get(&id).filter(|c| c.active).cloned()
    }

    /// Context entries of a category in insertion order.
    pub async fn context_for_category(&self, id: CategoryId) -> Vec<ContextEntry> {
        let state = self.state.read().await;
        state
            .context
            .iter()
            .filter(|e| e.category_id == id)
            .cloned()
            .collect()
    }

    #[instrument(skip_all, fields(session_id = %msg.session_id, kind = ?msg.message_type))]
    pub async fn insert_message(&self, msg: NewChatMessage) -> ChatMessage {
        let mut state = self.state.write().await;
        let stored = ChatMessage {
            message_id: next_id(&mut state.next_message_id),
            session_id: msg.session_id,
            user_id: msg.user_id,
            category_id: msg.category_id,
            message_type: msg.message_type,
            content: msg.content,
            created_at: Utc::now(),
        };
        state.messages.push(stored.clone());
        debug!(message_id = stored.message_id, "message stored");
        stored
    }

    /// Messages of one session, oldest first.
    pub async fn messages_for_session(&self, session_id: &str) -> Vec<ChatMessage> {
        let state = self.state.read().await;
        state
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect()
    }

    pub async fn session_exists(&self, session_id: &str) -> bool {
        self.state.read().await.sessions.contains_key(session_id)
    }

    /// User that opened `session_id`, if the session exists.
    pub async fn session_owner(&self, session_id: &str) -> Option<String> {
        self.state
            .read()
            .await
            .sessions
            .get(session_id)
            .map(|r| r.session.user_id.clone())
    }

    /// Creates the session or refreshes its category and `last_message_at`.
    ///
    /// `created_at` and the owning user are kept from the first write.
    #[instrument(skip_all, fields(session_id = %upsert.session_id))]
    pub async fn upsert_session(&self, upsert: SessionUpsert) -> ChatSession {
        let now = Utc::now();
        let mut state = self.state.write().await;
        state.write_seq += 1;
        let seq = state.write_seq;

        let row = match state.sessions.remove(&upsert.session_id) {
            Some(mut row) => {
                row.session.category_id = upsert.category_id;
                row.session.category_name = upsert.category_name;
                row.session.last_message_at = now;
                row.seq = seq;
                debug!("session updated");
                row
            }
            None => {
                debug!("session created");
                SessionRow {
                    session: ChatSession {
                        session_id: upsert.session_id,
                        user_id: upsert.user_id,
                        category_id: upsert.category_id,
                        category_name: upsert.category_name,
                        created_at: now,
                        last_message_at: now,
                    },
                    seq,
                }
            }
        };

        let session = row.session.clone();
        state.sessions.insert(session.session_id.clone(), row);
        session
    }

    /// One summary per session of `user_id`, most recently active first.
    ///
    /// `category_id` narrows to sessions of that category. `offset` and
    /// `size` page through the ordered list.
    pub async fn chat_history(
        &self,
        user_id: &str,
        category_id: Option<CategoryId>,
        offset: usize,
        size: usize,
    ) -> Vec<HistorySummary> {
        let state = self.state.read().await;

        let mut rows: Vec<&SessionRow> = state
            .sessions
            .values()
            .filter(|r| r.session.user_id == user_id)
            .filter(|r| category_id.is_none_or(|id| r.session.category_id == id))
            .collect();
        rows.sort_by(|a, b| {
            (b.session.last_message_at, b.seq).cmp(&(a.session.last_message_at, a.seq))
        });

        rows.into_iter()
            .skip(offset)
            .take(size)
            .map(|r| summarize(&r.session, &state.messages))
            .collect()
    }

    pub async fn insert_feedback(&self, fb: NewFeedback) -> Feedback {
        let mut state = self.state.write().await;
        let stored = Feedback {
            feedback_id: next_id(&mut state.next_feedback_id),
            session_id: fb.session_id,
            user_id: fb.user_id,
            rating: fb.rating,
            comment: fb.comment,
            message_id: fb.message_id,
            created_at: Utc::now(),
        };
        state.feedback.push(stored.clone());
        stored
    }

    pub async fn feedback_for_session(&self, session_id: &str) -> Vec<Feedback> {
        let state = self.state.read().await;
        state
            .feedback
            .iter()
            .filter(|f| f.session_id == session_id)
            .cloned()
            .collect()
    }
}

fn summarize(session: &ChatSession, messages: &[ChatMessage]) -> HistorySummary {
    let mut count = 0;
    let mut last: Option<&ChatMessage> = None;
    for m in messages.iter().filter(|m| m.session_id == session.session_id) {
        count += 1;
        last = Some(m);
    }

    HistorySummary {
        session_id: session.session_id.clone(),
        category_id: session.category_id,
        category_name: session.category_name.clone(),
        last_message: last.map(|m| m.content.clone()),
        last_message_at: session.last_message_at,
        message_count: count,
    }
}
