//! In-memory category repository.

use async_trait::async_trait;

use super::{MemoryCollection, SimulatedLatency};
use crate::domain::ports::{CategoryRepository, RecordStoreError};
use crate::domain::{Category, CategoryDraft, CategoryPatch, RecordId};

/// Category store owning its collection.
pub struct MemoryCategoryRepository {
    collection: MemoryCollection<Category>,
}

impl MemoryCategoryRepository {
    /// Build a store holding `categories`.
    pub fn new(categories: Vec<Category>, latency: SimulatedLatency) -> Self {
        Self {
            collection: MemoryCollection::new(categories, latency),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn get_all(&self) -> Result<Vec<Category>, RecordStoreError> {
        Ok(self.collection.all().await)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Category, RecordStoreError> {
        self.collection.get(id).await
    }

    async fn create(&self, draft: CategoryDraft) -> Result<Category, RecordStoreError> {
        self.collection
            .insert_with(|id| Category::from_draft(id, draft))
            .await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: CategoryPatch,
    ) -> Result<Category, RecordStoreError> {
        self.collection
            .modify(id, |category| {
                patch.apply_to(category);
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.collection.remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryCategoryRepository {
        MemoryCategoryRepository::new(
            vec![
                Category {
                    id: RecordId::new(2),
                    name: "Garden".to_owned(),
                },
                Category {
                    id: RecordId::new(7),
                    name: "Tools".to_owned(),
                },
            ],
            SimulatedLatency::none(),
        )
    }

    #[tokio::test]
    async fn create_follows_highest_identity() {
        let repo = seeded();
        let created = repo
            .create(CategoryDraft {
                name: "Paint".to_owned(),
            })
            .await
            .expect("create");

        assert_eq!(created.id, RecordId::new(8));
        assert_eq!(repo.get_all().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn rename_and_delete() {
        let repo = seeded();
        let renamed = repo
            .update(
                RecordId::new(2),
                CategoryPatch {
                    name: Some("Outdoor".to_owned()),
                },
            )
            .await
            .expect("update");
        assert_eq!(renamed.name, "Outdoor");

        assert_eq!(repo.delete(RecordId::new(2)).await, Ok(true));
        assert_eq!(
            repo.get_by_id(RecordId::new(2)).await,
            Err(RecordStoreError::not_found("category", 2_u32))
        );
    }
}
