//! Envelopes and row DTOs exchanged with the record API.
//!
//! Rows use the API's wire field names (`Name`, `sku_c`, ...). The
//! repositories decode rows into these DTOs first and map them into domain
//! records in one pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::RecordStoreError;
use crate::domain::{
    AdjustmentType, Category, CategoryRef, INITIAL_REVISION, Product, RecordId, StockAdjustment,
};

/// Envelope returned by fetch and single-record reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse<T> {
    /// Whether the API accepted the request.
    pub success: bool,
    /// Failure description when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload; absent for an empty result.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> RecordResponse<T> {
    /// Successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Failed envelope.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub(super) fn into_data(self) -> Result<Option<T>, RecordStoreError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(rejected_envelope(self.message))
        }
    }
}

const UNEXPLAINED_FAILURE: &str = "record API reported failure without a message";

fn rejected_envelope(message: Option<String>) -> RecordStoreError {
    RecordStoreError::remote(
        message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| UNEXPLAINED_FAILURE.to_owned()),
    )
}

/// Envelope returned by create, update, and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Whether the API accepted the request as a whole.
    pub success: bool,
    /// Failure description when `success` is false.
    #[serde(default)]
    pub message: Option<String>,
    /// Per-record outcomes.
    #[serde(default)]
    pub results: Vec<BatchResult>,
}

impl BatchResponse {
    /// Accepted batch with the given per-record outcomes.
    pub fn ok(results: Vec<BatchResult>) -> Self {
        Self {
            success: true,
            message: None,
            results,
        }
    }

    /// Collapse the batch into its successful results.
    ///
    /// Any failed record fails the whole call with one error describing the
    /// first failed record.
    pub(super) fn into_successes(self) -> Result<Vec<BatchResult>, RecordStoreError> {
        if !self.success {
            return Err(rejected_envelope(self.message));
        }
        if let Some(failed) = self.results.iter().find(|result| !result.success) {
            return Err(RecordStoreError::remote(failed.describe_failure()));
        }
        Ok(self.results)
    }
}

/// Outcome for one record of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Whether this record was accepted.
    pub success: bool,
    /// Field-level problems for a rejected record.
    #[serde(default)]
    pub errors: Vec<FieldError>,
    /// Record-level problem for a rejected record.
    #[serde(default)]
    pub message: Option<String>,
    /// Stored row for an accepted record.
    #[serde(default)]
    pub data: Option<Value>,
}

impl BatchResult {
    /// Accepted record carrying its stored row.
    pub fn stored(data: Value) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            message: None,
            data: Some(data),
        }
    }

    /// Rejected record.
    pub fn rejected(errors: Vec<FieldError>, message: Option<String>) -> Self {
        Self {
            success: false,
            errors,
            message,
            data: None,
        }
    }

    fn describe_failure(&self) -> String {
        self.errors
            .first()
            .map(|error| format!("{}: {}", error.field_label, error.message))
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "record rejected without a reason".to_owned())
    }
}

/// Field-level rejection reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Human-readable field label.
    pub field_label: String,
    /// What is wrong with the field.
    pub message: String,
}

/// Lookup column value as read: the referenced row's id and name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(super) enum LookupDto {
    Reference {
        #[serde(rename = "Id")]
        id: RecordId,
        #[serde(rename = "Name", default)]
        name: Option<String>,
    },
    Id(RecordId),
    Name(String),
}

impl LookupDto {
    fn id(&self) -> Option<RecordId> {
        match self {
            Self::Reference { id, .. } | Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }
}

/// Lookup column value as written: an id when known, otherwise a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub(super) enum LookupWriteDto {
    Id(RecordId),
    Name(String),
}

impl From<&CategoryRef> for LookupWriteDto {
    fn from(value: &CategoryRef) -> Self {
        match value {
            CategoryRef::ByReference { id, .. } => Self::Id(*id),
            CategoryRef::ByName(name) => Self::Name(name.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoryRowDto {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Name")]
    name: String,
}

impl CategoryRowDto {
    pub(super) fn into_domain(self) -> Result<Category, String> {
        Ok(Category {
            id: self.id,
            name: self.name,
        })
    }
}

#[derive(Debug, Default, Serialize)]
pub(super) struct CategoryWriteDto {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub(super) id: Option<RecordId>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub(super) name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductRowDto {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "sku_c", default)]
    sku: String,
    #[serde(rename = "category_c")]
    category: Option<LookupDto>,
    #[serde(rename = "price_c", default)]
    price: Decimal,
    #[serde(rename = "currentStock_c", default)]
    current_stock: u32,
    #[serde(rename = "lowStockThreshold_c", default)]
    low_stock_threshold: u32,
    #[serde(rename = "lastUpdated_c")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "ModifiedOn")]
    modified_on: Option<DateTime<Utc>>,
    #[serde(rename = "revision_c")]
    revision: Option<u32>,
}

impl ProductRowDto {
    pub(super) fn into_domain(self) -> Result<Product, String> {
        let category = match self.category {
            Some(LookupDto::Reference {
                id,
                name: Some(name),
            }) => CategoryRef::ByReference { id, name },
            Some(LookupDto::Name(name)) => CategoryRef::ByName(name),
            Some(other) => {
                return Err(format!(
                    "product {} references category {} without a name",
                    self.id,
                    other.id().map_or_else(String::new, |id| id.to_string())
                ));
            }
            None => return Err(format!("product {} has no category", self.id)),
        };
        let last_updated = self
            .last_updated
            .or(self.modified_on)
            .ok_or_else(|| format!("product {} has no last-updated timestamp", self.id))?;

        Ok(Product {
            id: self.id,
            name: self.name,
            sku: self.sku,
            category,
            price: self.price,
            current_stock: self.current_stock,
            low_stock_threshold: self.low_stock_threshold,
            last_updated,
            revision: self.revision.unwrap_or(INITIAL_REVISION),
        })
    }
}

#[derive(Debug, Default, Serialize)]
pub(super) struct ProductWriteDto {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub(super) id: Option<RecordId>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub(super) name: Option<String>,
    #[serde(rename = "sku_c", skip_serializing_if = "Option::is_none")]
    pub(super) sku: Option<String>,
    #[serde(rename = "category_c", skip_serializing_if = "Option::is_none")]
    pub(super) category: Option<LookupWriteDto>,
    #[serde(
        rename = "price_c",
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub(super) price: Option<Decimal>,
    #[serde(rename = "currentStock_c", skip_serializing_if = "Option::is_none")]
    pub(super) current_stock: Option<u32>,
    #[serde(rename = "lowStockThreshold_c", skip_serializing_if = "Option::is_none")]
    pub(super) low_stock_threshold: Option<u32>,
    #[serde(rename = "lastUpdated_c", skip_serializing_if = "Option::is_none")]
    pub(super) last_updated: Option<DateTime<Utc>>,
    #[serde(rename = "revision_c", skip_serializing_if = "Option::is_none")]
    pub(super) revision: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StockAdjustmentRowDto {
    #[serde(rename = "Id")]
    id: RecordId,
    #[serde(rename = "productId_c")]
    product: LookupDto,
    #[serde(rename = "type_c")]
    kind: AdjustmentType,
    #[serde(rename = "quantity_c")]
    quantity: u32,
    #[serde(rename = "reason_c", default)]
    reason: String,
    #[serde(rename = "timestamp_c")]
    timestamp: DateTime<Utc>,
}

impl StockAdjustmentRowDto {
    pub(super) fn into_domain(self) -> Result<StockAdjustment, String> {
        let product_id = self
            .product
            .id()
            .ok_or_else(|| format!("adjustment {} has no product id", self.id))?;
        if self.quantity == 0 {
            return Err(format!("adjustment {} has a zero quantity", self.id));
        }
        Ok(StockAdjustment {
            id: self.id,
            product_id,
            kind: self.kind,
            quantity: self.quantity,
            reason: self.reason,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, Default, Serialize)]
pub(super) struct StockAdjustmentWriteDto {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    pub(super) id: Option<RecordId>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub(super) name: Option<String>,
    #[serde(rename = "productId_c", skip_serializing_if = "Option::is_none")]
    pub(super) product_id: Option<RecordId>,
    #[serde(rename = "type_c", skip_serializing_if = "Option::is_none")]
    pub(super) kind: Option<AdjustmentType>,
    #[serde(rename = "quantity_c", skip_serializing_if = "Option::is_none")]
    pub(super) quantity: Option<u32>,
    #[serde(rename = "reason_c", skip_serializing_if = "Option::is_none")]
    pub(super) reason: Option<String>,
    #[serde(rename = "timestamp_c", skip_serializing_if = "Option::is_none")]
    pub(super) timestamp: Option<DateTime<Utc>>,
}
