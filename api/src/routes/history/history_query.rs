use category_detection::CategoryId;
use serde::Deserialize;

use crate::error_handler::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl HistoryQuery {
    pub fn validate(&self) -> AppResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(AppError::invalid_field("user_id", "must not be blank"));
        }
        Ok(())
    }

    /// `(offset, size)` with the size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn window(&self) -> (usize, usize) {
        let size = self.size.clamp(1, MAX_PAGE_SIZE);
        (self.page.saturating_mul(size), size)
    }
}
