//! Generic in-memory record collection with simulated latency.

use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::RecordStoreError;
use crate::domain::{RecordId, StoredRecord};

/// Default lower bound of the simulated per-call latency, in milliseconds.
pub const DEFAULT_LATENCY_MIN_MS: u64 = 150;
/// Default upper bound of the simulated per-call latency, in milliseconds.
pub const DEFAULT_LATENCY_MAX_MS: u64 = 400;

/// Latency window applied before every store call.
///
/// Each call sleeps for a uniformly sampled duration within `min..=max`.
/// A zero window disables the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    min: Duration,
    max: Duration,
}

impl SimulatedLatency {
    /// Build a window; the bounds are swapped when given in reverse.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Build a window from millisecond bounds.
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// No simulated delay.
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Whether calls complete without delay.
    pub fn is_disabled(&self) -> bool {
        self.max.is_zero()
    }

    /// Lower bound.
    pub const fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> Duration {
        self.max
    }

    fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    pub(crate) async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::from_millis(DEFAULT_LATENCY_MIN_MS, DEFAULT_LATENCY_MAX_MS)
    }
}

/// Owned collection of records of one entity type.
///
/// Every operation waits out the latency first and then runs to completion
/// under the lock, so a read-compare-write inside [`modify`](Self::modify)
/// cannot interleave with another call.
pub(crate) struct MemoryCollection<T> {
    records: Mutex<Vec<T>>,
    latency: SimulatedLatency,
}

impl<T: StoredRecord> MemoryCollection<T> {
    pub(crate) fn new(records: Vec<T>, latency: SimulatedLatency) -> Self {
        Self {
            records: Mutex::new(records),
            latency,
        }
    }

    pub(crate) async fn all(&self) -> Vec<T> {
        self.latency.wait().await;
        self.records.lock().await.clone()
    }

    pub(crate) async fn get(&self, id: RecordId) -> Result<T, RecordStoreError> {
        self.latency.wait().await;
        self.records
            .lock()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| RecordStoreError::not_found(T::ENTITY, id))
    }

    /// Store a record under `max(existing) + 1`.
    ///
    /// Fails once the highest identity in the collection is `u32::MAX`.
    pub(crate) async fn insert_with(
        &self,
        build: impl FnOnce(RecordId) -> T,
    ) -> Result<T, RecordStoreError> {
        self.latency.wait().await;
        let mut records = self.records.lock().await;
        let id = RecordId::next_after(records.iter().map(StoredRecord::id)).ok_or_else(|| {
            RecordStoreError::remote(format!("{} identity space exhausted", T::ENTITY))
        })?;
        let record = build(id);
        records.push(record.clone());
        debug!(entity = T::ENTITY, id = %id, "record created");
        Ok(record)
    }

    /// Apply `change` to a copy of the record and keep it only on success.
    pub(crate) async fn modify(
        &self,
        id: RecordId,
        change: impl FnOnce(&mut T) -> Result<(), RecordStoreError>,
    ) -> Result<T, RecordStoreError> {
        self.latency.wait().await;
        let mut records = self.records.lock().await;
        let stored = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| RecordStoreError::not_found(T::ENTITY, id))?;
        let mut candidate = stored.clone();
        change(&mut candidate)?;
        *stored = candidate.clone();
        debug!(entity = T::ENTITY, id = %id, "record updated");
        Ok(candidate)
    }

    pub(crate) async fn remove(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.latency.wait().await;
        let mut records = self.records.lock().await;
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RecordStoreError::not_found(T::ENTITY, id))?;
        records.remove(position);
        debug!(entity = T::ENTITY, id = %id, "record deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Bin {
        id: RecordId,
        label: &'static str,
    }

    impl StoredRecord for Bin {
        const ENTITY: &'static str = "bin";

        fn id(&self) -> RecordId {
            self.id
        }
    }

    fn bin(id: u32, label: &'static str) -> Bin {
        Bin {
            id: RecordId::new(id),
            label,
        }
    }

    #[rstest]
    #[case(SimulatedLatency::from_millis(400, 150), 150, 400)]
    #[case(SimulatedLatency::from_millis(0, 0), 0, 0)]
    fn latency_orders_bounds(
        #[case] latency: SimulatedLatency,
        #[case] min_ms: u64,
        #[case] max_ms: u64,
    ) {
        assert_eq!(latency.min(), Duration::from_millis(min_ms));
        assert_eq!(latency.max(), Duration::from_millis(max_ms));
    }

    #[rstest]
    fn sampled_latency_stays_in_window() {
        let latency = SimulatedLatency::default();
        for _ in 0..64 {
            let delay = latency.sample();
            assert!(delay >= latency.min() && delay <= latency.max());
        }
    }

    #[tokio::test]
    async fn insert_assigns_one_on_empty_collection() {
        let collection = MemoryCollection::new(Vec::new(), SimulatedLatency::none());
        let stored = collection
            .insert_with(|id| bin(id.get(), "first"))
            .await
            .expect("insert");
        assert_eq!(stored.id, RecordId::new(1));
    }

    #[tokio::test]
    async fn insert_assigns_max_plus_one() {
        let collection =
            MemoryCollection::new(vec![bin(7, "a"), bin(3, "b")], SimulatedLatency::none());
        let stored = collection
            .insert_with(|id| bin(id.get(), "c"))
            .await
            .expect("insert");
        assert_eq!(stored.id, RecordId::new(8));
    }

    #[tokio::test]
    async fn insert_refuses_to_reuse_the_highest_identity() {
        let collection = MemoryCollection::new(vec![bin(u32::MAX, "top")], SimulatedLatency::none());
        let result = collection.insert_with(|id| bin(id.get(), "new")).await;
        assert_eq!(
            result,
            Err(RecordStoreError::remote("bin identity space exhausted"))
        );
        assert_eq!(collection.all().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_modification_leaves_record_untouched() {
        let collection = MemoryCollection::new(vec![bin(1, "a")], SimulatedLatency::none());
        let result = collection
            .modify(RecordId::new(1), |record| {
                record.label = "changed";
                Err(RecordStoreError::remote("rejected"))
            })
            .await;
        assert!(result.is_err());
        let stored = collection.get(RecordId::new(1)).await.expect("still stored");
        assert_eq!(stored.label, "a");
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let collection: MemoryCollection<Bin> =
            MemoryCollection::new(Vec::new(), SimulatedLatency::none());
        let get = collection.get(RecordId::new(2)).await;
        let remove = collection.remove(RecordId::new(2)).await;
        let expected = RecordStoreError::not_found("bin", 2_u32);
        assert_eq!(get, Err(expected.clone()));
        assert_eq!(remove, Err(expected));
    }
}
