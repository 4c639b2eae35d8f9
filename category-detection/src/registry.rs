use std::{future::Future, pin::Pin};

use crate::{
    error::DetectionError,
    model::{Category, CategoryId},
};

/// Boxed `Send` future used by the object-safe seams of this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only access to the category catalogue.
///
/// Implement this trait to plug in a storage backend. Detection re-reads the
/// registry on every call; implementations are not expected to cache.
pub trait CategoryRegistry: Send + Sync {
    /// All categories available for classification, in display order.
    fn fetch_categories(&self) -> BoxFuture<'_, Result<Vec<Category>, DetectionError>>;

    /// A single category, or `None` if the id is unknown.
    fn fetch_category_by_id(
        &self,
        id: CategoryId,
    ) -> BoxFuture<'_, Result<Option<Category>, DetectionError>>;
}
