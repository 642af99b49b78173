//! Products domain module.
//!
//! This crate contains the product entity, the filter predicate shared by every
//! read surface, and report totals, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod filter;
pub mod product;
pub mod report;

pub use filter::{FilterParams, ProductFilter};
pub use product::{NewProduct, Product, ProductForm, MAX_QUANTITY, MAX_TEXT_CHARS};
pub use report::ProductReport;
