use serde::Serialize;

use crate::product::Product;

/// Filtered rows plus their totals, as shown by the report view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReport {
    pub rows: Vec<Product>,
    pub total_price: f64,
    pub total_quantity: i64,
}

impl ProductReport {
    pub fn from_rows(rows: Vec<Product>) -> Self {
        let total_price = rows.iter().map(|p| p.price).sum();
        let total_quantity = rows
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.quantity));
        Self {
            rows,
            total_price,
            total_quantity,
        }
    }
}
