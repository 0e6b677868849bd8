//! Startup wiring: settings and seeded in-memory stores.

mod config;
mod loader;

pub use config::InventorySettings;
pub use loader::{SeedLoadError, build_memory_inventory};
