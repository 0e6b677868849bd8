//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed inventory entities, the pure derivations
//! over them, and the services that coordinate record-store ports. Keep
//! types free of transport concerns and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): service error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Product, Category, StockAdjustment: stored records.
//! - ProductForm, AdjustmentRequest: validated user input.
//! - InventoryService: orchestrates the record-store ports.

pub mod category;
pub mod error;
pub mod inventory_service;
pub mod inventory_view;
pub mod ports;
pub mod product;
pub mod record;
pub mod stock_adjustment;
pub mod validation;

pub use self::category::{Category, CategoryDraft, CategoryPatch, CategoryRef};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::inventory_service::{InventoryService, StockAdjustmentOutcome};
pub use self::inventory_view::{
    EmptyState, InventorySnapshot, InventoryView, ProductFilter, SortDirection, SortField,
    SortOrder, filter_products, low_stock_products, sort_products,
};
pub use self::product::{
    INITIAL_REVISION, Product, ProductDraft, ProductPatch, StockStatus,
};
pub use self::record::{RecordId, StoredRecord};
pub use self::stock_adjustment::{
    AdjustmentReason, AdjustmentRequest, AdjustmentType, ParseAdjustmentTypeError,
    QUICK_ADJUST_STEP, STANDARD_REASONS, StockAdjustment, StockAdjustmentDraft,
    StockAdjustmentPatch, StockPreview, compute_new_stock,
};
pub use self::validation::{
    DEFAULT_LOW_STOCK_THRESHOLD, FieldViolation, FormField, ProductForm, ValidProduct,
    ValidationErrors,
};

/// Convenient service result alias.
///
/// # Examples
/// ```
/// use inventory::domain::{Error, ServiceResult};
///
/// fn lookup() -> ServiceResult<u32> {
///     Err(Error::not_found("product 9 not found"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ServiceResult<T> = Result<T, Error>;
