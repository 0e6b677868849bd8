//! Seed data for the in-memory stores.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Product, StockAdjustment};

const BUNDLED_SEED: &str = include_str!("../../../fixtures/inventory-seed.json");

/// Initial contents of the three in-memory collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySeed {
    /// Seed categories.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Seed products.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Seed adjustment history.
    #[serde(default)]
    pub adjustments: Vec<StockAdjustment>,
}

impl InventorySeed {
    /// Parse a seed document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Seed shipped with the crate for demos and offline use.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, StockStatus, low_stock_products};
    use rstest::rstest;

    #[rstest]
    fn bundled_seed_parses() {
        let seed = InventorySeed::bundled().expect("bundled seed is valid");
        assert_eq!(seed.categories.len(), 4);
        assert_eq!(seed.products.len(), 7);
        assert!(seed.products.iter().all(|product| product.revision == 1));
    }

    #[rstest]
    fn bundled_seed_covers_every_stock_status() {
        let seed = InventorySeed::bundled().expect("bundled seed is valid");
        for status in [StockStatus::InStock, StockStatus::LowStock, StockStatus::OutOfStock] {
            assert!(
                seed.products.iter().any(|product| product.stock_status() == status),
                "missing {status}"
            );
        }
        let low: Vec<RecordId> = low_stock_products(&seed.products)
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(low, vec![RecordId::new(2), RecordId::new(5), RecordId::new(7)]);
    }

    #[rstest]
    fn missing_collections_default_to_empty() {
        let seed = InventorySeed::from_json(r#"{ "categories": [] }"#).expect("parses");
        assert_eq!(seed, InventorySeed::default());
    }
}
