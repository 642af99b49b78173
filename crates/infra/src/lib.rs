//! Infrastructure layer: product storage, spreadsheet codec, config.

pub mod config;
pub mod store;
pub mod tabular;

pub use config::{AppConfig, ConfigError, StoreKind};
pub use store::{BulkOutcome, InMemoryProductStore, ProductStore, SqliteProductStore};
