//! Port for the stock adjustment audit log.

use async_trait::async_trait;

use crate::domain::{RecordId, StockAdjustment, StockAdjustmentDraft, StockAdjustmentPatch};

use super::RecordStoreError;

/// Port for stock adjustment records.
///
/// Adjustments are append-only in normal operation: the inventory service
/// only calls [`create`](StockAdjustmentRepository::create) and the read
/// methods. Update and delete complete the CRUD contract for
/// administrative use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockAdjustmentRepository: Send + Sync {
    /// Every adjustment, newest first.
    async fn get_all(&self) -> Result<Vec<StockAdjustment>, RecordStoreError>;

    /// One adjustment; fails with `NotFound` when absent.
    async fn get_by_id(&self, id: RecordId) -> Result<StockAdjustment, RecordStoreError>;

    /// Append an adjustment under the next free identity.
    async fn create(
        &self,
        draft: StockAdjustmentDraft,
    ) -> Result<StockAdjustment, RecordStoreError>;

    /// Merge `patch` into a stored adjustment.
    async fn update(
        &self,
        id: RecordId,
        patch: StockAdjustmentPatch,
    ) -> Result<StockAdjustment, RecordStoreError>;

    /// Remove an adjustment; fails with `NotFound` when absent.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError>;
}
