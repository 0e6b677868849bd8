//! Derived inventory state: filtering, low-stock alerts, and sorting.
//!
//! Everything here is pure computation over an in-memory product list. The
//! results borrow from the input and always keep its relative order, apart
//! from [`sort_products`], which reorders by the selected field.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Category, Product};

/// Search and category filter as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name and SKU.
    pub search_term: String,
    /// Exact category display name; empty matches every category.
    pub category: String,
}

impl ProductFilter {
    /// Filter with a search term only.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            category: String::new(),
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Whether any filter narrows the list.
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || !self.category.is_empty()
    }

    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.matches_category(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        product.name.to_lowercase().contains(&needle) || product.sku.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category.is_empty() || product.category_name() == self.category
    }
}

/// Products passing `filter`, in input order.
///
/// # Examples
/// ```
/// use inventory::domain::{Product, ProductFilter, filter_products};
///
/// let products: Vec<Product> = Vec::new();
/// assert!(filter_products(&products, &ProductFilter::default()).is_empty());
/// ```
pub fn filter_products<'a>(products: &'a [Product], filter: &ProductFilter) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| filter.matches(product))
        .collect()
}

/// Products in the low-stock alert set, in input order.
///
/// A product qualifies when `0 < current_stock <= low_stock_threshold`;
/// out-of-stock products are excluded.
pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.is_low_stock())
        .collect()
}

/// Field a product list can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Product name.
    #[default]
    Name,
    /// SKU.
    Sku,
    /// Category display name.
    Category,
    /// Unit price.
    Price,
    /// Current stock.
    CurrentStock,
    /// Low-stock threshold.
    LowStockThreshold,
    /// Last-updated timestamp.
    LastUpdated,
}

impl SortField {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => compare_text(&a.name, &b.name),
            Self::Sku => compare_text(&a.sku, &b.sku),
            Self::Category => compare_text(a.category_name(), b.category_name()),
            Self::Price => a.price.cmp(&b.price),
            Self::CurrentStock => a.current_stock.cmp(&b.current_stock),
            Self::LowStockThreshold => a.low_stock_threshold.cmp(&b.low_stock_threshold),
            Self::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Selected sort field and direction. Defaults to name ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrder {
    /// Field compared.
    pub field: SortField,
    /// Direction applied.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Order after the user selects `field`.
    ///
    /// Selecting the current field flips the direction; selecting another
    /// field sorts by it ascending.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::{SortDirection, SortField, SortOrder};
    ///
    /// let order = SortOrder::default().toggled(SortField::Name);
    /// assert_eq!(order.direction, SortDirection::Desc);
    /// let order = order.toggled(SortField::Price);
    /// assert_eq!((order.field, order.direction), (SortField::Price, SortDirection::Asc));
    /// ```
    #[must_use]
    pub fn toggled(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort in place by `order`.
///
/// Text fields compare case-insensitively and categories by display name.
/// The sort is stable, so equal keys keep their input order.
pub fn sort_products(products: &mut [&Product], order: SortOrder) {
    products.sort_by(|a, b| order.compare(a, b));
}

/// Why a derived product list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// No filter is active and the inventory holds no products.
    NoProducts,
    /// A filter is active and nothing passes it, whether or not the
    /// inventory holds products.
    NoMatches,
}

/// Products and categories as last loaded from the record stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    /// Every product.
    pub products: Vec<Product>,
    /// Every category.
    pub categories: Vec<Category>,
}

impl InventorySnapshot {
    /// Derive the visible list and alert set.
    pub fn view(&self, filter: &ProductFilter, order: SortOrder) -> InventoryView<'_> {
        let mut visible = filter_products(&self.products, filter);
        sort_products(&mut visible, order);
        let empty_state = match (visible.is_empty(), filter.is_active()) {
            (false, _) => None,
            (true, true) => Some(EmptyState::NoMatches),
            (true, false) => Some(EmptyState::NoProducts),
        };

        InventoryView {
            visible,
            low_stock: low_stock_products(&self.products),
            empty_state,
        }
    }

    /// Replace a product after a successful write, or append a new one.
    pub fn upsert_product(&mut self, product: Product) {
        match self.products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Drop a product after a successful delete.
    pub fn remove_product(&mut self, id: super::RecordId) {
        self.products.retain(|product| product.id != id);
    }
}

/// Derived state for one render of the inventory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView<'a> {
    /// Filtered and sorted products.
    pub visible: Vec<&'a Product>,
    /// Low-stock alert set over the unfiltered inventory.
    pub low_stock: Vec<&'a Product>,
    /// Set when `visible` is empty.
    pub empty_state: Option<EmptyState>,
}

#[cfg(test)]
#[path = "inventory_view_tests.rs"]
mod tests;
