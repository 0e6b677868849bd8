//! Record API repositories implementing the record-store ports.
//!
//! Every call maps transport failures, rejected envelopes, and failed batch
//! records onto [`RecordStoreError::Remote`]. Updates and deletes read the
//! row first so that a missing identity surfaces as `NotFound`. Product revisions live in the
//! `revision_c` column; the compare-and-swap is a read followed by a
//! conditional write, so it narrows rather than closes the race window.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::client::{RecordApiClient, RecordApiError, RecordQuery, SortType};
use super::dto::{
    CategoryRowDto, CategoryWriteDto, LookupWriteDto, ProductRowDto, ProductWriteDto,
    StockAdjustmentRowDto, StockAdjustmentWriteDto,
};
use crate::domain::ports::{
    CategoryRepository, ProductRepository, RecordStoreError, StockAdjustmentRepository,
};
use crate::domain::{
    Category, CategoryDraft, CategoryPatch, Product, ProductDraft, ProductPatch, RecordId,
    StockAdjustment, StockAdjustmentDraft, StockAdjustmentPatch,
};

/// Product table name.
pub const PRODUCT_TABLE: &str = "product_c";
/// Category table name.
pub const CATEGORY_TABLE: &str = "category_c";
/// Stock adjustment table name.
pub const STOCK_ADJUSTMENT_TABLE: &str = "stock_adjustment_c";

const PRODUCT_FIELDS: &[&str] = &[
    "Name",
    "sku_c",
    "category_c",
    "price_c",
    "currentStock_c",
    "lowStockThreshold_c",
    "lastUpdated_c",
    "revision_c",
    "ModifiedOn",
];
const CATEGORY_FIELDS: &[&str] = &["Name"];
const STOCK_ADJUSTMENT_FIELDS: &[&str] = &[
    "Name",
    "productId_c",
    "type_c",
    "quantity_c",
    "reason_c",
    "timestamp_c",
];

fn map_transport_error(error: RecordApiError) -> RecordStoreError {
    RecordStoreError::remote(error.to_string())
}

fn encode(payload: &impl Serialize) -> Result<Value, RecordStoreError> {
    serde_json::to_value(payload)
        .map_err(|err| RecordStoreError::remote(format!("failed to encode record: {err}")))
}

/// One table of the record API with its default query.
struct RecordTable<C> {
    client: Arc<C>,
    table: &'static str,
    entity: &'static str,
    query: RecordQuery,
}

impl<C: RecordApiClient> RecordTable<C> {
    fn decode<D, T>(&self, row: Value, map: fn(D) -> Result<T, String>) -> Result<T, RecordStoreError>
    where
        D: DeserializeOwned,
    {
        serde_json::from_value(row)
            .map_err(|err| err.to_string())
            .and_then(map)
            .map_err(|message| {
                RecordStoreError::remote(format!("malformed {} row: {message}", self.table))
            })
    }

    async fn fetch<D, T>(&self, map: fn(D) -> Result<T, String>) -> Result<Vec<T>, RecordStoreError>
    where
        D: DeserializeOwned,
    {
        let rows = self
            .client
            .fetch_records(self.table, &self.query)
            .await
            .map_err(map_transport_error)?
            .into_data()?
            .unwrap_or_default();
        debug!(table = self.table, rows = rows.len(), "records fetched");
        rows.into_iter().map(|row| self.decode(row, map)).collect()
    }

    async fn get<D, T>(
        &self,
        id: RecordId,
        map: fn(D) -> Result<T, String>,
    ) -> Result<T, RecordStoreError>
    where
        D: DeserializeOwned,
    {
        let row = self
            .client
            .get_record(self.table, id, &self.query)
            .await
            .map_err(map_transport_error)?
            .into_data()?
            .ok_or_else(|| RecordStoreError::not_found(self.entity, id))?;
        self.decode(row, map)
    }

    async fn create<D, T>(
        &self,
        payload: Value,
        map: fn(D) -> Result<T, String>,
    ) -> Result<T, RecordStoreError>
    where
        D: DeserializeOwned,
    {
        let row = self
            .client
            .create_records(self.table, vec![payload])
            .await
            .map_err(map_transport_error)?
            .into_successes()?
            .into_iter()
            .find_map(|result| result.data)
            .ok_or_else(|| {
                RecordStoreError::remote(format!("{} create returned no record", self.table))
            })?;
        let record = self.decode(row, map)?;
        debug!(table = self.table, "record created");
        Ok(record)
    }

    /// Returns the stored row when the API echoes it back.
    async fn update(&self, payload: Value) -> Result<Option<Value>, RecordStoreError> {
        let row = self
            .client
            .update_records(self.table, vec![payload])
            .await
            .map_err(map_transport_error)?
            .into_successes()?
            .into_iter()
            .find_map(|result| result.data);
        debug!(table = self.table, echoed = row.is_some(), "record updated");
        Ok(row)
    }

    async fn ensure_exists(&self, id: RecordId) -> Result<(), RecordStoreError> {
        self.client
            .get_record(self.table, id, &self.query)
            .await
            .map_err(map_transport_error)?
            .into_data()?
            .map(|_| ())
            .ok_or_else(|| RecordStoreError::not_found(self.entity, id))
    }

    /// Fails with `NotFound` before sending the delete when `id` is absent.
    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.ensure_exists(id).await?;
        let deleted = self
            .client
            .delete_records(self.table, vec![id])
            .await
            .map_err(map_transport_error)?
            .into_successes()?
            .iter()
            .any(|result| result.success);
        debug!(table = self.table, id = %id, deleted, "record delete requested");
        Ok(deleted)
    }
}

/// Products over the record API, ordered by name.
pub struct RecordApiProductRepository<C> {
    table: RecordTable<C>,
}

impl<C> RecordApiProductRepository<C> {
    /// Build the repository over `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            table: RecordTable {
                client,
                table: PRODUCT_TABLE,
                entity: "product",
                query: RecordQuery::select(PRODUCT_FIELDS).order_by("Name", SortType::Asc),
            },
        }
    }
}

#[async_trait]
impl<C: RecordApiClient> ProductRepository for RecordApiProductRepository<C> {
    async fn get_all(&self) -> Result<Vec<Product>, RecordStoreError> {
        self.table.fetch(ProductRowDto::into_domain).await
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Product, RecordStoreError> {
        self.table.get(id, ProductRowDto::into_domain).await
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, RecordStoreError> {
        let payload = encode(&ProductWriteDto {
            name: Some(draft.name),
            sku: Some(draft.sku),
            category: Some(LookupWriteDto::from(&draft.category)),
            price: Some(draft.price),
            current_stock: Some(draft.current_stock),
            low_stock_threshold: Some(draft.low_stock_threshold),
            last_updated: Some(draft.last_updated),
            revision: Some(crate::domain::INITIAL_REVISION),
            ..ProductWriteDto::default()
        })?;
        self.table.create(payload, ProductRowDto::into_domain).await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: ProductPatch,
        expected_revision: Option<u32>,
    ) -> Result<Product, RecordStoreError> {
        let mut current = self.get_by_id(id).await?;
        if let Some(expected) = expected_revision.filter(|rev| *rev != current.revision) {
            return Err(RecordStoreError::revision_mismatch(
                id,
                expected,
                current.revision,
            ));
        }
        let next_revision = current.revision.saturating_add(1);
        let payload = encode(&ProductWriteDto {
            id: Some(id),
            name: patch.name.clone(),
            sku: patch.sku.clone(),
            category: patch.category.as_ref().map(LookupWriteDto::from),
            price: patch.price,
            current_stock: patch.current_stock,
            low_stock_threshold: patch.low_stock_threshold,
            last_updated: patch.last_updated,
            revision: Some(next_revision),
        })?;

        match self.table.update(payload).await? {
            Some(row) => self.table.decode(row, ProductRowDto::into_domain),
            None => {
                patch.apply_to(&mut current);
                current.revision = next_revision;
                Ok(current)
            }
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.table.delete(id).await
    }

    async fn get_low_stock(&self) -> Result<Vec<Product>, RecordStoreError> {
        let mut products = self.get_all().await?;
        products.retain(Product::needs_restock);
        Ok(products)
    }
}

/// Categories over the record API.
pub struct RecordApiCategoryRepository<C> {
    table: RecordTable<C>,
}

impl<C> RecordApiCategoryRepository<C> {
    /// Build the repository over `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            table: RecordTable {
                client,
                table: CATEGORY_TABLE,
                entity: "category",
                query: RecordQuery::select(CATEGORY_FIELDS),
            },
        }
    }
}

#[async_trait]
impl<C: RecordApiClient> CategoryRepository for RecordApiCategoryRepository<C> {
    async fn get_all(&self) -> Result<Vec<Category>, RecordStoreError> {
        self.table.fetch(CategoryRowDto::into_domain).await
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Category, RecordStoreError> {
        self.table.get(id, CategoryRowDto::into_domain).await
    }

    async fn create(&self, draft: CategoryDraft) -> Result<Category, RecordStoreError> {
        let payload = encode(&CategoryWriteDto {
            id: None,
            name: Some(draft.name),
        })?;
        self.table.create(payload, CategoryRowDto::into_domain).await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: CategoryPatch,
    ) -> Result<Category, RecordStoreError> {
        let mut category = self.get_by_id(id).await?;
        let payload = encode(&CategoryWriteDto {
            id: Some(id),
            name: patch.name.clone(),
        })?;
        match self.table.update(payload).await? {
            Some(row) => self.table.decode(row, CategoryRowDto::into_domain),
            None => {
                patch.apply_to(&mut category);
                Ok(category)
            }
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.table.delete(id).await
    }
}

/// Stock adjustments over the record API, newest first.
pub struct RecordApiStockAdjustmentRepository<C> {
    table: RecordTable<C>,
}

impl<C> RecordApiStockAdjustmentRepository<C> {
    /// Build the repository over `client`.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            table: RecordTable {
                client,
                table: STOCK_ADJUSTMENT_TABLE,
                entity: "stock adjustment",
                query: RecordQuery::select(STOCK_ADJUSTMENT_FIELDS)
                    .order_by("timestamp_c", SortType::Desc),
            },
        }
    }
}

#[async_trait]
impl<C: RecordApiClient> StockAdjustmentRepository for RecordApiStockAdjustmentRepository<C> {
    async fn get_all(&self) -> Result<Vec<StockAdjustment>, RecordStoreError> {
        self.table.fetch(StockAdjustmentRowDto::into_domain).await
    }

    async fn get_by_id(&self, id: RecordId) -> Result<StockAdjustment, RecordStoreError> {
        self.table.get(id, StockAdjustmentRowDto::into_domain).await
    }

    async fn create(
        &self,
        draft: StockAdjustmentDraft,
    ) -> Result<StockAdjustment, RecordStoreError> {
        let payload = encode(&StockAdjustmentWriteDto {
            id: None,
            name: Some(draft.label()),
            product_id: Some(draft.product_id),
            kind: Some(draft.kind),
            quantity: Some(draft.quantity),
            reason: Some(draft.reason),
            timestamp: Some(draft.timestamp),
        })?;
        self.table
            .create(payload, StockAdjustmentRowDto::into_domain)
            .await
    }

    async fn update(
        &self,
        id: RecordId,
        patch: StockAdjustmentPatch,
    ) -> Result<StockAdjustment, RecordStoreError> {
        let mut adjustment = self.get_by_id(id).await?;
        let payload = encode(&StockAdjustmentWriteDto {
            id: Some(id),
            reason: patch.reason.clone(),
            ..StockAdjustmentWriteDto::default()
        })?;
        match self.table.update(payload).await? {
            Some(row) => self.table.decode(row, StockAdjustmentRowDto::into_domain),
            None => {
                patch.apply_to(&mut adjustment);
                Ok(adjustment)
            }
        }
    }

    async fn delete(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        self.table.delete(id).await
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
