//! Database-free store backing the router tests.

use crate::models::{Category, CategoryChanges};
use crate::services::store::{duplicate_name_error, CategoryStore};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryCategoryStore {
    categories: RwLock<Vec<Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn insert(&self, category: Category) -> Result<Category, AppError> {
        let mut categories = self.categories.write().await;
        if categories.iter().any(|c| c.name == category.name) {
            return Err(duplicate_name_error(&category.name));
        }
        categories.push(category.clone());
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.read().await.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| &c.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn update(
        &self,
        id: &ObjectId,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, AppError> {
        let mut categories = self.categories.write().await;

        if let Some(name) = &changes.name {
            if categories.iter().any(|c| &c.name == name && &c.id != id) {
                return Err(duplicate_name_error(name));
            }
        }

        Ok(categories.iter_mut().find(|c| &c.id == id).map(|category| {
            category.apply(changes);
            category.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| &c.id != id);
        Ok(categories.len() < before)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name.to_string(), None)
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = InMemoryCategoryStore::new();
        store.insert(category("b")).await.unwrap();
        store.insert(category("a")).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected_and_store_unchanged() {
        let store = InMemoryCategoryStore::new();
        store.insert(category("Test")).await.unwrap();

        let err = store.insert(category("Test")).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_taken_name_is_rejected() {
        let store = InMemoryCategoryStore::new();
        store.insert(category("first")).await.unwrap();
        let second = store.insert(category("second")).await.unwrap();

        let err = store
            .update(
                &second.id,
                CategoryChanges {
                    name: Some("first".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        let unchanged = store.find_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "second");
    }

    #[tokio::test]
    async fn renaming_to_own_name_is_allowed() {
        let store = InMemoryCategoryStore::new();
        let created = store.insert(category("same")).await.unwrap();

        let updated = store
            .update(
                &created.id,
                CategoryChanges {
                    name: Some("same".to_string()),
                    description: Some(Some("d".to_string())),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn missing_ids_report_absence() {
        let store = InMemoryCategoryStore::new();
        let id = ObjectId::new();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store
            .update(&id, CategoryChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(&id).await.unwrap());
    }
}
