//! In-memory product repository.

use async_trait::async_trait;

use super::{MemoryCollection, SimulatedLatency};
use crate::domain::ports::{ProductRepository, RecordStoreError};
use crate::domain::{Product, ProductDraft, ProductPatch, RecordId};

/// Product store owning its collection.
pub struct MemoryProductRepository {
    collection: MemoryCollection<Product>,
}

impl MemoryProductRepository {
    /// Build a store holding `products`.
    pub fn new(products: Vec<Product>, latency: SimulatedLatency) -> Self {
        Self {
            collection: MemoryCollection::new(products, latency),
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn get_all(&self) -> Result<Vec<Product>, RecordStoreError> {
        let mut products = self.collection.all().await;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Product, RecordStoreError> {
        self.collection.get(id).await
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, RecordStoreError> {
        self.collection
            .insert_with(|id| Product::from_draft(id, draft))
            .await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: ProductPatch,
        expected_revision: Option<u32>,
    ) -> Result<Product, RecordStoreError> {
        self.collection
            .modify(id, |product| {
                if let Some(expected) = expected_revision.filter(|rev| *rev != product.revision) {
                    return Err(RecordStoreError::revision_mismatch(
                        id,
                        expected,
                        product.revision,
                    ));
                }
                patch.apply_to(product);
                product.advance_revision();
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.collection.remove(id).await
    }

    async fn get_low_stock(&self) -> Result<Vec<Product>, RecordStoreError> {
        let mut products = self.get_all().await?;
        products.retain(Product::needs_restock);
        Ok(products)
    }
}
