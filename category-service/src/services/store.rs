use crate::models::{Category, CategoryChanges};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

/// Persistence seam for categories.
///
/// Implementations own the uniqueness of `name`: a write that would duplicate an existing
/// name fails with [`duplicate_name_error`] and leaves the store unchanged.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, category: Category) -> Result<Category, AppError>;

    /// All categories in the store's natural (insertion) order.
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Category>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;

    /// Applies `changes` and returns the record as it is after the write, or `None` when
    /// no category has `id`.
    async fn update(
        &self,
        id: &ObjectId,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, AppError>;

    /// Returns whether a category was removed.
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

pub fn duplicate_name_error(name: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(
        "A category named \"{}\" already exists",
        name
    ))
}
