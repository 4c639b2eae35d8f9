//! Storage for the smart-search chat service.
//!
//! Everything lives in process memory. A JSON seed file can preload
//! categories and their context data at startup.

pub mod errors;
pub mod memory_store;
pub mod record;

mod registry;

pub use errors::{Result, StoreError};
pub use memory_store::{MemoryStore, Seed};
pub use record::{
    CategoryRecord, ChatMessage, ChatSession, ContextEntry, Feedback, HistorySummary,
    MessageType, NewChatMessage, NewFeedback, SessionUpsert,
};
