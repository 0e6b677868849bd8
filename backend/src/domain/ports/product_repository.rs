//! Port for product records.
//!
//! The [`ProductRepository`] trait is the CRUD boundary between inventory
//! services and whatever keeps product records: the in-memory store used
//! for demos and tests, or a remote record API.

use async_trait::async_trait;

use crate::domain::{Product, ProductDraft, ProductPatch, RecordId};

use super::RecordStoreError;

/// Port for product storage and retrieval.
///
/// # Revision Semantics
///
/// - Created products start at revision 1.
/// - Every successful [`update`](ProductRepository::update) increments the
///   revision by one.
/// - Updates that pass `expected_revision` fail with
///   [`RecordStoreError::RevisionMismatch`] when the stored revision differs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, ordered by name.
    async fn get_all(&self) -> Result<Vec<Product>, RecordStoreError>;

    /// One product; fails with `NotFound` when absent.
    async fn get_by_id(&self, id: RecordId) -> Result<Product, RecordStoreError>;

    /// Store a new product under the next free identity.
    async fn create(&self, draft: ProductDraft) -> Result<Product, RecordStoreError>;

    /// Merge `patch` into a stored product and return the result.
    async fn update(
        &self,
        id: RecordId,
        patch: ProductPatch,
        expected_revision: Option<u32>,
    ) -> Result<Product, RecordStoreError>;

    /// Remove a product; fails with `NotFound` when absent.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError>;

    /// Products at or below their threshold, out-of-stock ones included.
    ///
    /// This is a restock query. The low-stock alert set shown to users
    /// excludes zero stock; see [`crate::domain::low_stock_products`].
    async fn get_low_stock(&self) -> Result<Vec<Product>, RecordStoreError>;
}
