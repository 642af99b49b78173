//! `motorshop-core` — shared building blocks for the inventory crates.
//!
//! This crate holds the error taxonomy and identifiers only (no IO).

pub mod error;
pub mod id;

pub use error::{ErrorKind, InventoryError, InventoryResult};
pub use id::ProductId;
