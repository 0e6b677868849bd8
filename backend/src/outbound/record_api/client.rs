//! Transport seam for the remote record API.
//!
//! [`RecordApiClient`] is the only part of the remote adapter that talks to
//! the network. Repositories build queries and payloads, the client ships
//! them, and the envelopes it returns are interpreted by the repositories.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::dto::{BatchResponse, RecordResponse};
use crate::domain::RecordId;
use crate::domain::ports::define_port_error;

define_port_error! {
    /// Failures raised by a record API transport.
    pub enum RecordApiError {
        /// The request never produced a response.
        Transport { message: String } =>
            "record API transport failed: {message}",
        /// The API answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "record API rejected the request with status {status}: {message}",
    }
}

/// Sort direction understood by the record API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// One ordering clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    /// Wire field name.
    #[serde(rename = "fieldName")]
    pub field_name: String,
    /// Direction.
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Field selection and ordering for a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Wire field names to return.
    pub fields: Vec<String>,
    /// Ordering clauses, applied in sequence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl RecordQuery {
    /// Select `fields` in table order.
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|field| (*field).to_owned()).collect(),
            order_by: Vec::new(),
        }
    }

    /// Append an ordering clause.
    #[must_use]
    pub fn order_by(mut self, field_name: &str, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field_name.to_owned(),
            sort_type,
        });
        self
    }
}

/// Record API operations used by the remote repositories.
///
/// Rows and payloads are raw JSON objects keyed by wire field names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordApiClient: Send + Sync {
    /// Fetch every row of `table`.
    async fn fetch_records(
        &self,
        table: &str,
        query: &RecordQuery,
    ) -> Result<RecordResponse<Vec<Value>>, RecordApiError>;

    /// Fetch one row by identity.
    async fn get_record(
        &self,
        table: &str,
        id: RecordId,
        query: &RecordQuery,
    ) -> Result<RecordResponse<Value>, RecordApiError>;

    /// Insert rows.
    async fn create_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<BatchResponse, RecordApiError>;

    /// Update rows; each payload carries its `Id`.
    async fn update_records(
        &self,
        table: &str,
        records: Vec<Value>,
    ) -> Result<BatchResponse, RecordApiError>;

    /// Delete rows by identity.
    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<RecordId>,
    ) -> Result<BatchResponse, RecordApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn query_serialises_with_wire_names() {
        let query = RecordQuery::select(&["Name", "sku_c"]).order_by("Name", SortType::Asc);
        let value = serde_json::to_value(&query).expect("serialises");
        assert_eq!(
            value,
            json!({
                "fields": ["Name", "sku_c"],
                "orderBy": [{ "fieldName": "Name", "sorttype": "ASC" }],
            })
        );
    }

    #[rstest]
    fn rejected_error_mentions_status() {
        let err = RecordApiError::rejected(503_u16, "maintenance");
        assert!(err.to_string().contains("503"));
        assert_eq!(err.kind(), "Rejected");
    }
}
