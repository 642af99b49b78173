//! Product persistence.
//!
//! The store is the only owner of product records. Callers get snapshots back
//! from [`ProductStore::query`] and hand candidates in through `create` and
//! `bulk_create`; every mutation is all-or-nothing.

pub mod in_memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use motorshop_core::{InventoryError, InventoryResult};
use motorshop_products::{NewProduct, Product, ProductFilter};

pub use in_memory::InMemoryProductStore;
pub use sqlite::SqliteProductStore;

/// Result of a successful bulk insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub created: usize,
}

/// Product store abstraction.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Validate and insert one product, returning it with its assigned id.
    async fn create(&self, candidate: NewProduct) -> InventoryResult<Product>;

    /// Insert every candidate in one transaction, or none of them.
    async fn bulk_create(&self, candidates: Vec<NewProduct>) -> InventoryResult<BulkOutcome>;

    /// All products matching `filter`, in insertion order.
    async fn query(&self, filter: &ProductFilter) -> InventoryResult<Vec<Product>>;

    async fn count(&self) -> InventoryResult<u64>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, candidate: NewProduct) -> InventoryResult<Product> {
        (**self).create(candidate).await
    }

    async fn bulk_create(&self, candidates: Vec<NewProduct>) -> InventoryResult<BulkOutcome> {
        (**self).bulk_create(candidates).await
    }

    async fn query(&self, filter: &ProductFilter) -> InventoryResult<Vec<Product>> {
        (**self).query(filter).await
    }

    async fn count(&self) -> InventoryResult<u64> {
        (**self).count().await
    }
}

/// Validate a batch, naming the 1-based position of the first bad candidate.
pub(crate) fn validate_batch(candidates: Vec<NewProduct>) -> InventoryResult<Vec<NewProduct>> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, c)| c.validate().map_err(|e| at_position(idx, e)))
        .collect()
}

fn at_position(idx: usize, err: InventoryError) -> InventoryError {
    match err {
        InventoryError::Validation(msg) => {
            InventoryError::validation(format!("product #{}: {msg}", idx + 1))
        }
        other => other,
    }
}
