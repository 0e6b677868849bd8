//! Product aggregate and stock status classification.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CategoryRef, RecordId, StoredRecord};

/// Revision assigned to a freshly created product.
pub const INITIAL_REVISION: u32 = 1;

const fn initial_revision() -> u32 {
    INITIAL_REVISION
}

/// A catalogue product with its current stock level.
///
/// ## Invariants
/// - `current_stock` and `low_stock_threshold` are never negative (enforced
///   by their unsigned types).
/// - `revision` starts at [`INITIAL_REVISION`] and increases by one on every
///   stored update; it backs the optimistic concurrency check on writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identity.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit, uppercase by convention.
    pub sku: String,
    /// Category by name or by reference.
    pub category: CategoryRef,
    /// Unit price.
    pub price: Decimal,
    /// Units currently on hand.
    pub current_stock: u32,
    /// Stock level at or below which the product counts as low.
    pub low_stock_threshold: u32,
    /// Timestamp of the last mutation.
    pub last_updated: DateTime<Utc>,
    /// Optimistic concurrency revision.
    #[serde(default = "initial_revision")]
    pub revision: u32,
}

impl Product {
    /// Build a stored product from its draft and assigned identity.
    pub fn from_draft(id: RecordId, draft: ProductDraft) -> Self {
        let ProductDraft {
            name,
            sku,
            category,
            price,
            current_stock,
            low_stock_threshold,
            last_updated,
        } = draft;
        Self {
            id,
            name,
            sku,
            category,
            price,
            current_stock,
            low_stock_threshold,
            last_updated,
            revision: INITIAL_REVISION,
        }
    }

    /// Display name of the product's category.
    pub fn category_name(&self) -> &str {
        self.category.display_name()
    }

    /// Three-way stock classification.
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.current_stock, self.low_stock_threshold)
    }

    /// Whether the product belongs in the low-stock alert set.
    ///
    /// Out-of-stock products are excluded: a product qualifies only when
    /// `0 < current_stock <= low_stock_threshold`.
    pub fn is_low_stock(&self) -> bool {
        self.stock_status() == StockStatus::LowStock
    }

    /// Whether the product is at or below its threshold, zero included.
    pub fn needs_restock(&self) -> bool {
        self.current_stock <= self.low_stock_threshold
    }

    /// Move to the next revision after a stored update.
    pub(crate) fn advance_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

impl StoredRecord for Product {
    const ENTITY: &'static str = "product";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Fields supplied when creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Category by name or by reference.
    pub category: CategoryRef,
    /// Unit price.
    pub price: Decimal,
    /// Initial stock level.
    pub current_stock: u32,
    /// Low-stock threshold.
    pub low_stock_threshold: u32,
    /// Creation timestamp.
    pub last_updated: DateTime<Utc>,
}

/// Partial product update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    /// Replacement name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement SKU.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Replacement category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    /// Replacement price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Replacement stock level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stock: Option<u32>,
    /// Replacement low-stock threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,
    /// Replacement last-updated timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProductPatch {
    /// Patch touching only the stock level and its timestamp.
    pub fn stock_level(current_stock: u32, last_updated: DateTime<Utc>) -> Self {
        Self {
            current_stock: Some(current_stock),
            last_updated: Some(last_updated),
            ..Self::default()
        }
    }

    /// Merge the patch into `product`. The revision is not touched.
    pub fn apply_to(self, product: &mut Product) {
        let Self {
            name,
            sku,
            category,
            price,
            current_stock,
            low_stock_threshold,
            last_updated,
        } = self;
        if let Some(name) = name {
            product.name = name;
        }
        if let Some(sku) = sku {
            product.sku = sku;
        }
        if let Some(category) = category {
            product.category = category;
        }
        if let Some(price) = price {
            product.price = price;
        }
        if let Some(current_stock) = current_stock {
            product.current_stock = current_stock;
        }
        if let Some(low_stock_threshold) = low_stock_threshold {
            product.low_stock_threshold = low_stock_threshold;
        }
        if let Some(last_updated) = last_updated {
            product.last_updated = last_updated;
        }
    }
}

/// Mutually exclusive stock classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock is above the threshold.
    InStock,
    /// Stock is positive and at or below the threshold.
    LowStock,
    /// Stock is exactly zero.
    OutOfStock,
}

impl StockStatus {
    /// Classify a stock level against its threshold.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::StockStatus;
    ///
    /// assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
    /// assert_eq!(StockStatus::classify(3, 5), StockStatus::LowStock);
    /// assert_eq!(StockStatus::classify(10, 5), StockStatus::InStock);
    /// ```
    pub const fn classify(current_stock: u32, low_stock_threshold: u32) -> Self {
        if current_stock == 0 {
            Self::OutOfStock
        } else if current_stock <= low_stock_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
