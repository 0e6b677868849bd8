//! Inventory domain service.
//!
//! Coordinates the product, category, and stock adjustment ports: loading
//! the inventory, saving validated product forms, and committing stock
//! adjustments with an optimistic revision check.
//!
//! A stock adjustment writes the product first, guarded by the revision it
//! read, and appends the audit record second. There is no rollback: when
//! the append fails the stock change stays committed and the caller gets a
//! `RemoteFailure` whose details carry `stockCommitted: true`.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CategoryRepository, ProductRepository, RecordStoreError, StockAdjustmentRepository,
};
use crate::domain::{
    AdjustmentRequest, AdjustmentType, Error, InventorySnapshot, Product, ProductDraft,
    ProductForm, ProductPatch, RecordId, StockAdjustment, StockAdjustmentDraft, StockPreview,
    ValidProduct,
};

/// Result of a committed (or skipped) stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustmentOutcome {
    /// Product as stored after the adjustment.
    pub product: Product,
    /// Audit record, absent when the stock did not change.
    pub adjustment: Option<StockAdjustment>,
    /// Calculation the commit was based on.
    pub preview: StockPreview,
}

/// Inventory service over the three record-store ports.
#[derive(Clone)]
pub struct InventoryService<P, C, A> {
    products: Arc<P>,
    categories: Arc<C>,
    adjustments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<P, C, A> InventoryService<P, C, A> {
    /// Create a new service with the given repositories.
    ///
    /// # Examples
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use inventory::domain::InventoryService;
    /// # use inventory::outbound::memory::MemoryInventory;
    /// # use mockable::DefaultClock;
    /// let stores = MemoryInventory::default();
    /// let service = InventoryService::new(
    ///     stores.products,
    ///     stores.categories,
    ///     stores.adjustments,
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        products: Arc<P>,
        categories: Arc<C>,
        adjustments: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            products,
            categories,
            adjustments,
            clock,
        }
    }
}

impl<P, C, A> InventoryService<P, C, A>
where
    P: ProductRepository,
    C: CategoryRepository,
    A: StockAdjustmentRepository,
{
    /// Load products and categories concurrently.
    ///
    /// Either failure fails the whole load.
    pub async fn load_inventory(&self) -> Result<InventorySnapshot, Error> {
        let (products, categories) = tokio::try_join!(
            async {
                self.products
                    .get_all()
                    .await
                    .map_err(map_record_store_error)
            },
            async {
                self.categories
                    .get_all()
                    .await
                    .map_err(map_record_store_error)
            },
        )?;
        debug!(
            products = products.len(),
            categories = categories.len(),
            "inventory loaded"
        );
        Ok(InventorySnapshot {
            products,
            categories,
        })
    }

    /// Validate a product form and store it as a new product.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, Error> {
        let valid = validate_form(form)?;
        let draft = self.draft_from(valid).await?;
        let product = self
            .products
            .create(draft)
            .await
            .map_err(map_record_store_error)?;
        info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    /// Validate a product form and apply it to an existing product.
    ///
    /// Passing `expected_revision` rejects the write with `Conflict` when
    /// the product changed since the caller read it.
    pub async fn update_product(
        &self,
        id: RecordId,
        form: &ProductForm,
        expected_revision: Option<u32>,
    ) -> Result<Product, Error> {
        let valid = validate_form(form)?;
        let ProductDraft {
            name,
            sku,
            category,
            price,
            current_stock,
            low_stock_threshold,
            last_updated,
        } = self.draft_from(valid).await?;
        let patch = ProductPatch {
            name: Some(name),
            sku: Some(sku),
            category: Some(category),
            price: Some(price),
            current_stock: Some(current_stock),
            low_stock_threshold: Some(low_stock_threshold),
            last_updated: Some(last_updated),
        };
        let product = self
            .products
            .update(id, patch, expected_revision)
            .await
            .map_err(map_record_store_error)?;
        info!(product_id = %product.id, revision = product.revision, "product updated");
        Ok(product)
    }

    /// Delete a product.
    pub async fn delete_product(&self, id: RecordId) -> Result<(), Error> {
        let deleted = self
            .products
            .delete(id)
            .await
            .map_err(map_record_store_error)?;
        if !deleted {
            return Err(Error::not_found(format!("product {id} not found")));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Apply a validated adjustment to a product's stock.
    ///
    /// The new stock is computed from a fresh read of the product and
    /// written with a compare-and-swap on the revision that read returned.
    /// A caller that previewed the adjustment against an older read may pin
    /// that revision through `expected_revision`.
    pub async fn adjust_stock(
        &self,
        product_id: RecordId,
        expected_revision: Option<u32>,
        request: &AdjustmentRequest,
    ) -> Result<StockAdjustmentOutcome, Error> {
        let product = self
            .products
            .get_by_id(product_id)
            .await
            .map_err(map_record_store_error)?;
        if let Some(expected) = expected_revision.filter(|rev| *rev != product.revision) {
            return Err(revision_conflict(product_id, expected, product.revision));
        }

        let preview = request.preview(product.current_stock);
        let now = self.clock.utc();
        let Some(draft) =
            StockAdjustmentDraft::for_transition(&product, preview.new_stock, &request.reason, now)
        else {
            debug!(product_id = %product_id, kind = %request.kind, "adjustment leaves stock unchanged");
            return Ok(StockAdjustmentOutcome {
                product,
                adjustment: None,
                preview,
            });
        };

        let updated = self
            .products
            .update(
                product_id,
                ProductPatch::stock_level(preview.new_stock, now),
                Some(product.revision),
            )
            .await
            .map_err(map_record_store_error)?;

        match self.adjustments.create(draft).await {
            Ok(adjustment) => {
                info!(
                    product_id = %product_id,
                    adjustment_id = %adjustment.id,
                    previous = preview.current_stock,
                    new_stock = preview.new_stock,
                    "stock adjusted"
                );
                Ok(StockAdjustmentOutcome {
                    product: updated,
                    adjustment: Some(adjustment),
                    preview,
                })
            }
            Err(err) => {
                warn!(
                    product_id = %product_id,
                    new_stock = preview.new_stock,
                    error_kind = err.kind(),
                    error = %err,
                    "stock committed without an adjustment record"
                );
                Err(Error::remote_failure(format!(
                    "stock for product {product_id} was updated but the adjustment record was not saved: {err}"
                ))
                .with_details(json!({
                    "stockCommitted": true,
                    "productId": product_id,
                    "newStock": preview.new_stock,
                    "revision": updated.revision,
                    "cause": err.kind(),
                })))
            }
        }
    }

    /// Step a product's stock by one with a generated reason.
    pub async fn quick_adjust(
        &self,
        product_id: RecordId,
        kind: AdjustmentType,
    ) -> Result<StockAdjustmentOutcome, Error> {
        self.adjust_stock(product_id, None, &AdjustmentRequest::quick(kind))
            .await
    }

    /// Products at or below their threshold, out-of-stock ones included.
    pub async fn restock_candidates(&self) -> Result<Vec<Product>, Error> {
        self.products
            .get_low_stock()
            .await
            .map_err(map_record_store_error)
    }

    /// Adjustments newest first, optionally for a single product.
    pub async fn adjustment_history(
        &self,
        product_id: Option<RecordId>,
    ) -> Result<Vec<StockAdjustment>, Error> {
        let mut history = self
            .adjustments
            .get_all()
            .await
            .map_err(map_record_store_error)?;
        if let Some(product_id) = product_id {
            history.retain(|adjustment| adjustment.product_id == product_id);
        }
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(history)
    }

    async fn draft_from(&self, valid: ValidProduct) -> Result<ProductDraft, Error> {
        let categories = self
            .categories
            .get_all()
            .await
            .map_err(map_record_store_error)?;
        let category = valid.category_ref(&categories);
        let ValidProduct {
            name,
            sku,
            price,
            current_stock,
            low_stock_threshold,
            ..
        } = valid;
        Ok(ProductDraft {
            name,
            sku,
            category,
            price,
            current_stock,
            low_stock_threshold,
            last_updated: self.clock.utc(),
        })
    }
}

fn validate_form(form: &ProductForm) -> Result<ValidProduct, Error> {
    form.validate().map_err(|errors| {
        debug!(violations = errors.len(), "product form rejected");
        Error::validation_failed(&errors)
    })
}

/// Map a record-store failure onto the domain error taxonomy.
pub fn map_record_store_error(error: RecordStoreError) -> Error {
    match error {
        RecordStoreError::NotFound { entity, id } => {
            Error::not_found(format!("{entity} {id} not found")).with_details(json!({
                "entity": entity,
                "id": id,
            }))
        }
        RecordStoreError::Remote { message } => Error::remote_failure(message),
        RecordStoreError::RevisionMismatch {
            id,
            expected,
            actual,
        } => revision_conflict(id, expected, actual),
    }
}

fn revision_conflict(id: RecordId, expected: u32, actual: u32) -> Error {
    Error::conflict(format!("record {id} changed since it was read")).with_details(json!({
        "id": id,
        "expectedRevision": expected,
        "actualRevision": actual,
        "code": "revision_mismatch",
    }))
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
