//! Port for category records.

use async_trait::async_trait;

use crate::domain::{Category, CategoryDraft, CategoryPatch, RecordId};

use super::RecordStoreError;

/// Port for category storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category in store order.
    async fn get_all(&self) -> Result<Vec<Category>, RecordStoreError>;

    /// One category; fails with `NotFound` when absent.
    async fn get_by_id(&self, id: RecordId) -> Result<Category, RecordStoreError>;

    /// Store a new category under the next free identity.
    async fn create(&self, draft: CategoryDraft) -> Result<Category, RecordStoreError>;

    /// Merge `patch` into a stored category.
    async fn update(&self, id: RecordId, patch: CategoryPatch)
    -> Result<Category, RecordStoreError>;

    /// Remove a category; fails with `NotFound` when absent.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError>;
}
