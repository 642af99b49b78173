use std::sync::RwLock;

use async_trait::async_trait;

use motorshop_core::{InventoryError, InventoryResult, ProductId};
use motorshop_products::{NewProduct, Product, ProductFilter};

use super::{validate_batch, BulkOutcome, ProductStore};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Product>,
    last_id: i64,
}

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> InventoryError {
    InventoryError::storage("in-memory product store lock poisoned")
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, candidate: NewProduct) -> InventoryResult<Product> {
        let candidate = candidate.validate()?;
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.last_id += 1;
        let product = Product::from_new(ProductId::new(inner.last_id), candidate);
        inner.rows.push(product.clone());
        Ok(product)
    }

    async fn bulk_create(&self, candidates: Vec<NewProduct>) -> InventoryResult<BulkOutcome> {
        // Validate everything up front so a bad candidate leaves the store untouched.
        let candidates = validate_batch(candidates)?;
        let created = candidates.len();

        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        for candidate in candidates {
            inner.last_id += 1;
            let id = ProductId::new(inner.last_id);
            inner.rows.push(Product::from_new(id, candidate));
        }
        Ok(BulkOutcome { created })
    }

    async fn query(&self, filter: &ProductFilter) -> InventoryResult<Vec<Product>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn count(&self) -> InventoryResult<u64> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.rows.len() as u64)
    }
}
