//! In-memory stock adjustment log.

use async_trait::async_trait;

use super::{MemoryCollection, SimulatedLatency};
use crate::domain::ports::{RecordStoreError, StockAdjustmentRepository};
use crate::domain::{RecordId, StockAdjustment, StockAdjustmentDraft, StockAdjustmentPatch};

/// Adjustment store owning its collection.
pub struct MemoryStockAdjustmentRepository {
    collection: MemoryCollection<StockAdjustment>,
}

impl MemoryStockAdjustmentRepository {
    /// Build a store holding `adjustments`.
    pub fn new(adjustments: Vec<StockAdjustment>, latency: SimulatedLatency) -> Self {
        Self {
            collection: MemoryCollection::new(adjustments, latency),
        }
    }
}

#[async_trait]
impl StockAdjustmentRepository for MemoryStockAdjustmentRepository {
    async fn get_all(&self) -> Result<Vec<StockAdjustment>, RecordStoreError> {
        let mut adjustments = self.collection.all().await;
        adjustments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(adjustments)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<StockAdjustment, RecordStoreError> {
        self.collection.get(id).await
    }

    async fn create(
        &self,
        draft: StockAdjustmentDraft,
    ) -> Result<StockAdjustment, RecordStoreError> {
        self.collection
            .insert_with(|id| StockAdjustment::from_draft(id, draft))
            .await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: StockAdjustmentPatch,
    ) -> Result<StockAdjustment, RecordStoreError> {
        self.collection
            .modify(id, |adjustment| {
                patch.apply_to(adjustment);
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
    use crate::domain::AdjustmentType;
    use chrono::{TimeZone, Utc};

    fn draft(product_id: u32, minute: u32) -> StockAdjustmentDraft {
        StockAdjustmentDraft {
            product_id: RecordId::new(product_id),
            product_name: String::new(),
            kind: AdjustmentType::Increase,
            quantity: 2,
            reason: "Received shipment".to_owned(),
            timestamp: Utc
                .with_ymd_and_hms(2026, 4, 2, 9, minute, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[tokio::test]
    async fn history_lists_newest_first() {
        let repo = MemoryStockAdjustmentRepository::new(Vec::new(), SimulatedLatency::none());
        for minute in [5, 30, 10] {
            repo.create(draft(1, minute)).await.expect("create");
        }

        let ids: Vec<u32> = repo
            .get_all()
            .await
            .expect("list")
            .iter()
            .map(|adjustment| adjustment.id.get())
            .collect();

        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn reason_correction_keeps_other_fields() {
        let repo = MemoryStockAdjustmentRepository::new(Vec::new(), SimulatedLatency::none());
        let created = repo.create(draft(4, 0)).await.expect("create");

        let corrected = repo
            .update(
                created.id,
                StockAdjustmentPatch {
                    reason: Some("Return".to_owned()),
                },
            )
            .await
            .expect("update");

        assert_eq!(corrected.reason, "Return");
        assert_eq!(corrected.quantity, created.quantity);
        assert_eq!(corrected.product_id, RecordId::new(4));
    }
}
