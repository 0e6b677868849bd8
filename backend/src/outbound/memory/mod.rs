//! In-memory record stores.
//!
//! Each store owns its collection and simulates remote latency before
//! every call. They back the demo binary and the integration tests.

mod category;
mod collection;
mod product;
mod seed;
mod stock_adjustment;

use std::sync::Arc;

pub use category::MemoryCategoryRepository;
pub(crate) use collection::MemoryCollection;
pub use collection::{DEFAULT_LATENCY_MAX_MS, DEFAULT_LATENCY_MIN_MS, SimulatedLatency};
pub use product::MemoryProductRepository;
pub use seed::InventorySeed;
pub use stock_adjustment::MemoryStockAdjustmentRepository;

/// The three in-memory stores, ready to hand to a service.
#[derive(Clone)]
pub struct MemoryInventory {
    /// Product store.
    pub products: Arc<MemoryProductRepository>,
    /// Category store.
    pub categories: Arc<MemoryCategoryRepository>,
    /// Stock adjustment store.
    pub adjustments: Arc<MemoryStockAdjustmentRepository>,
}

impl MemoryInventory {
    /// Build stores holding `seed`, each with the same latency window.
    pub fn seeded(seed: InventorySeed, latency: SimulatedLatency) -> Self {
        let InventorySeed {
            categories,
            products,
            adjustments,
        } = seed;
        Self {
            products: Arc::new(MemoryProductRepository::new(products, latency)),
            categories: Arc::new(MemoryCategoryRepository::new(categories, latency)),
            adjustments: Arc::new(MemoryStockAdjustmentRepository::new(adjustments, latency)),
        }
    }
}

impl Default for MemoryInventory {
    /// Empty stores without simulated latency.
    fn default() -> Self {
        Self::seeded(InventorySeed::default(), SimulatedLatency::none())
    }
}
