//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-memory record stores with simulated latency
//! - **record_api**: repositories over a remote record API client
//!
//! Adapters are thin translators between domain types and storage
//! representations. They contain no business logic.

pub mod memory;
pub mod record_api;
