use category_detection::CategoryId;
use serde::Serialize;
use smart_search_store::CategoryRecord;

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(r: CategoryRecord) -> Self {
        Self {
            category_id: r.category_id,
            name: r.name,
            description: r.description,
            icon: r.icon,
            sort_order: r.sort_order,
        }
    }
}
