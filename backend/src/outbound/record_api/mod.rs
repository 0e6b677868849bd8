//! Remote record API adapter.
//!
//! Implements the record-store ports over a [`RecordApiClient`]. The
//! concrete transport is supplied by the embedding application.

mod client;
mod dto;
mod repository;

#[cfg(test)]
pub use client::MockRecordApiClient;
pub use client::{OrderBy, RecordApiClient, RecordApiError, RecordQuery, SortType};
pub use dto::{BatchResponse, BatchResult, FieldError, RecordResponse};
pub use repository::{
    CATEGORY_TABLE, PRODUCT_TABLE, RecordApiCategoryRepository, RecordApiProductRepository,
    RecordApiStockAdjustmentRepository, STOCK_ADJUSTMENT_TABLE,
};
