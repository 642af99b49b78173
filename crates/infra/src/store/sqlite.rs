//! SQLite-backed product store.
//!
//! Every mutation runs inside one SQL transaction. On any failure the
//! transaction is rolled back explicitly before the error is returned, so a
//! failed `create` or `bulk_create` never leaves rows behind.
//!
//! SQLx errors are mapped to `InventoryError::Storage`; the message carries the
//! operation name and is meant for logs, not for end users.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, Transaction};
use tracing::instrument;

use motorshop_core::{InventoryError, InventoryResult, ProductId};
use motorshop_products::{NewProduct, Product, ProductFilter};

use super::{validate_batch, BulkOutcome, ProductStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT    NOT NULL,
        category TEXT    NOT NULL,
        price    REAL    NOT NULL,
        quantity INTEGER NOT NULL
    )
"#;

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (name, category, price, quantity)
    VALUES (?1, ?2, ?3, ?4)
"#;

/// Product store on a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Wrap an existing pool. The schema must already exist; see [`Self::ensure_schema`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating the file if needed) the database at `database_url` and
    /// make sure the `products` table exists.
    ///
    /// In-memory URLs get a single, never-recycled connection so every caller
    /// sees the same database.
    pub async fn connect(database_url: &str) -> InventoryResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("parse_database_url", e))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        tracing::info!(database_url, "product store ready");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> InventoryResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_table", e))?;
        Ok(())
    }

    async fn begin(&self) -> InventoryResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn insert(tx: &mut Transaction<'static, Sqlite>, candidate: &NewProduct) -> InventoryResult<ProductId> {
    let result = sqlx::query(INSERT_PRODUCT)
        .bind(&candidate.name)
        .bind(&candidate.category)
        .bind(candidate.price)
        .bind(candidate.quantity)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
    Ok(ProductId::new(result.last_insert_rowid()))
}

/// Roll back and hand the original error back to the caller.
async fn abort(tx: Transaction<'static, Sqlite>, err: InventoryError) -> InventoryError {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
    err
}

async fn commit(tx: Transaction<'static, Sqlite>) -> InventoryResult<()> {
    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("commit_transaction", e))
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::new(row.try_get::<i64, _>("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
    })
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    #[instrument(skip(self, candidate), err)]
    async fn create(&self, candidate: NewProduct) -> InventoryResult<Product> {
        let candidate = candidate.validate()?;

        let mut tx = self.begin().await?;
        let id = match insert(&mut tx, &candidate).await {
            Ok(id) => id,
            Err(e) => return Err(abort(tx, e).await),
        };
        commit(tx).await?;

        tracing::debug!(product_id = %id, "product created");
        Ok(Product::from_new(id, candidate))
    }

    #[instrument(skip(self, candidates), fields(count = candidates.len()), err)]
    async fn bulk_create(&self, candidates: Vec<NewProduct>) -> InventoryResult<BulkOutcome> {
        let mut tx = self.begin().await?;

        let candidates = match validate_batch(candidates) {
            Ok(c) => c,
            Err(e) => return Err(abort(tx, e).await),
        };

        for candidate in &candidates {
            if let Err(e) = insert(&mut tx, candidate).await {
                return Err(abort(tx, e).await);
            }
        }
        commit(tx).await?;

        tracing::info!(created = candidates.len(), "bulk insert committed");
        Ok(BulkOutcome {
            created: candidates.len(),
        })
    }

    #[instrument(skip(self), err)]
    async fn query(&self, filter: &ProductFilter) -> InventoryResult<Vec<Product>> {
        // The price bound is exact in SQL; text matching goes through the shared
        // predicate so every surface gets identical case folding.
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, price, quantity
            FROM products
            WHERE (?1 IS NULL OR price >= ?1)
            ORDER BY id
            "#,
        )
        .bind(filter.effective_min_price())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("query_products", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product =
                product_from_row(row).map_err(|e| map_sqlx_error("decode_product_row", e))?;
            if filter.matches(&product) {
                products.push(product);
            }
        }
        Ok(products)
    }

    async fn count(&self) -> InventoryResult<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_products", e))?;
        Ok(n.max(0) as u64)
    }
}

/// Map SQLx errors to `InventoryError::Storage`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> InventoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            InventoryError::storage(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            InventoryError::storage(format!("connection pool closed in {operation}"))
        }
        other => InventoryError::storage(format!("sqlx error in {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteProductStore {
        SqliteProductStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn create_then_query_returns_the_record() {
        let store = store().await;
        let created = store
            .create(NewProduct::new("Oil Filter", "Filters", 12.5, 100))
            .await
            .unwrap();

        let all = store.query(&ProductFilter::all()).await.unwrap();
        assert_eq!(all, vec![created.clone()]);
        assert_eq!(created.name, "Oil Filter");
        assert_eq!(created.category, "Filters");
        assert_eq!(created.price, 12.5);
        assert_eq!(created.quantity, 100);
        assert!(created.id.get() > 0);
    }

    #[tokio::test]
    async fn min_price_filter_selects_upper_rows() {
        let store = store().await;
        store
            .bulk_create(vec![
                NewProduct::new("A", "Parts", 10.0, 1),
                NewProduct::new("B", "Parts", 20.0, 2),
                NewProduct::new("C", "Parts", 30.0, 3),
            ])
            .await
            .unwrap();

        let rows = store
            .query(&ProductFilter::all().with_min_price(15.0))
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn zero_min_price_keeps_negative_prices() {
        let store = store().await;
        store.create(NewProduct::new("Credit", "Misc", -5.0, 1)).await.unwrap();

        let rows = store
            .query(&ProductFilter::all().with_min_price(0.0))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn text_filters_ignore_case() {
        let store = store().await;
        store
            .bulk_create(vec![
                NewProduct::new("Oil Filter", "Filters", 10.0, 1),
                NewProduct::new("Brake Pad", "Brakes", 20.0, 2),
            ])
            .await
            .unwrap();

        let rows = store
            .query(&ProductFilter::all().with_name("OIL").with_category("filt"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Oil Filter");

        let none = store
            .query(&ProductFilter::all().with_name("spark"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn invalid_batch_is_rolled_back() {
        let store = store().await;
        store.create(NewProduct::new("Existing", "X", 1.0, 1)).await.unwrap();

        let err = store
            .bulk_create(vec![
                NewProduct::new("Good", "X", 1.0, 1),
                NewProduct::new("Bad", "", 1.0, 1),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_failure_mid_batch_rolls_back_earlier_rows() {
        let store = store().await;
        store.create(NewProduct::new("Existing", "X", 1.0, 1)).await.unwrap();
        sqlx::query(
            r#"
            CREATE TRIGGER reject_recalled BEFORE INSERT ON products
            WHEN NEW.name = 'Recalled'
            BEGIN
                SELECT RAISE(ABORT, 'recalled part');
            END
            "#,
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store
            .bulk_create(vec![
                NewProduct::new("Good", "X", 1.0, 1),
                NewProduct::new("Also Good", "X", 2.0, 2),
                NewProduct::new("Recalled", "X", 3.0, 3),
            ])
            .await
            .unwrap_err();
        match err {
            InventoryError::Storage(msg) => assert!(msg.contains("insert_product")),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(store.count().await.unwrap(), 1);
        let names: Vec<String> = store
            .query(&ProductFilter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Existing".to_string()]);
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_writing() {
        let store = store().await;
        let err = store
            .create(NewProduct::new("   ", "X", 1.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_batch_creates_nothing() {
        let store = store().await;
        let outcome = store.bulk_create(Vec::new()).await.unwrap();
        assert_eq!(outcome, BulkOutcome { created: 0 });
    }
}
