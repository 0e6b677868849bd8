//! Inventory settings loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::ProductForm;
use crate::outbound::memory::SimulatedLatency;

/// Configuration values controlling the in-memory inventory at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVENTORY")]
pub struct InventorySettings {
    /// Load seed data into the in-memory stores.
    #[ortho_config(default = true)]
    pub seed_enabled: bool,
    /// Seed file override; the bundled seed is used when unset.
    pub seed_path: Option<PathBuf>,
    /// Lower bound of the simulated store latency.
    #[ortho_config(default = 150)]
    pub latency_min_ms: u64,
    /// Upper bound of the simulated store latency.
    #[ortho_config(default = 400)]
    pub latency_max_ms: u64,
    /// Threshold pre-filled on a fresh product form.
    #[ortho_config(default = 5)]
    pub default_low_stock_threshold: u32,
}

impl InventorySettings {
    /// Latency window for the in-memory stores.
    pub fn latency(&self) -> SimulatedLatency {
        SimulatedLatency::from_millis(self.latency_min_ms, self.latency_max_ms)
    }

    /// Blank product form carrying the configured threshold.
    pub fn blank_product_form(&self) -> ProductForm {
        ProductForm::with_threshold(self.default_low_stock_threshold)
    }
}
