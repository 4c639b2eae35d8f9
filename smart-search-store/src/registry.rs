//! Exposes the store's active categories to the detection pipeline.

use category_detection::{BoxFuture, Category, CategoryId, CategoryRegistry, DetectionError};

use crate::memory_store::MemoryStore;

impl CategoryRegistry for MemoryStore {
    fn fetch_categories(&self) -> BoxFuture<'_, Result<Vec<Category>, DetectionError>> {
        Box::pin(async move {
            let records = self.list_active_categories().await;
            Ok(records.iter().map(Category::from).collect())
        })
    }

    fn fetch_category_by_id(
        &self,
        id: CategoryId,
    ) -> BoxFuture<'_, Result<Option<Category>, DetectionError>> {
        Box::pin(async move { Ok(self.category_by_id(id).await.as_ref().map(Category::from)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CategoryRecord;

    fn record(id: CategoryId, name: &str, sort_order: i32, active: bool) -> CategoryRecord {
        CategoryRecord {
            category_id: id,
            name: name.into(),
            description: format!("about {name}"),
            icon: Some("📦".into()),
            sort_order,
            active,
        }
    }

    #[tokio::test]
    async fn registry_sees_active_categories_in_display_order() {
        let store = MemoryStore::new();
        store.add_category(record(1, "Deploy", 2, true)).await;
        store.add_category(record(2, "Network", 1, true)).await;
        store.add_category(record(3, "Retired", 0, false)).await;

        let cats = store.fetch_categories().await.unwrap();
        assert_eq!(
            cats,
            vec![
                Category::new(2, "Network", "about Network"),
                Category::new(1, "Deploy", "about Deploy"),
            ]
        );

        assert_eq!(store.fetch_category_by_id(3).await.unwrap(), None);
        assert_eq!(
            store.fetch_category_by_id(1).await.unwrap().map(|c| c.name),
            Some("Deploy".to_string())
        );
    }
}
