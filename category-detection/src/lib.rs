//! Category detection pipeline.
//!
//! Given a free-text user message, asks a language model to classify it
//! against the categories held by a [`CategoryRegistry`], and mines the
//! unstructured answer for a category id, a confidence score, or a keyword
//! list. Every public operation of [`CategoryDetector`] is total: failures
//! degrade to a documented fallback value instead of an error.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use category_detection::{CancelToken, CategoryDetector, CategoryRegistry, DetectionConfig, ModelInvoker};
//! # async fn run(registry: Arc<dyn CategoryRegistry>, invoker: Arc<dyn ModelInvoker>) {
//! let detector = CategoryDetector::new(registry, invoker, DetectionConfig::default());
//! let shutdown = CancelToken::new();
//! let found = detector
//!     .detect_category_with_retry("Jenkins deploy keeps failing", 3, &shutdown)
//!     .await;
//! println!("{:?}", found.category_id());
//! # }
//! ```

mod cancel;
mod config;
mod detector;
mod error;
mod invoker;
mod model;
mod registry;

pub mod extract;
pub mod prompt;

pub use cancel::{CancelToken, WaitOutcome, cancellable_wait};
pub use config::DetectionConfig;
pub use detector::CategoryDetector;
pub use error::DetectionError;
pub use invoker::ModelInvoker;
pub use model::{Category, CategoryId, ConfidenceScore, DetectionResult, KeywordSet};
pub use registry::{BoxFuture, CategoryRegistry};
