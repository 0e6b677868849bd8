//! Error shared by every record-store port.

use crate::domain::RecordId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by record-store adapters.
    pub enum RecordStoreError {
        /// No record with the requested identity exists.
        NotFound { entity: String, id: RecordId } =>
            "{entity} {id} not found",
        /// The backing store rejected or failed the request.
        Remote { message: String } =>
            "record store request failed: {message}",
        /// Optimistic concurrency check failed.
        RevisionMismatch { id: RecordId, expected: u32, actual: u32 } =>
            "revision mismatch for record {id}: expected {expected}, found {actual}",
    }
}
