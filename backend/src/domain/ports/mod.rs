//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod category_repository;
mod product_repository;
mod record_store_error;
mod stock_adjustment_repository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::CategoryRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::ProductRepository;
pub use record_store_error::RecordStoreError;
#[cfg(test)]
pub use stock_adjustment_repository::MockStockAdjustmentRepository;
pub use stock_adjustment_repository::StockAdjustmentRepository;
