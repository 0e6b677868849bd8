//! Inventory library modules.

pub mod domain;
pub mod outbound;
pub mod seed_data;
