use serde::Serialize;

use motorshop_products::{Product, ProductFilter, ProductForm, ProductReport};

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

/// One-shot message shown next to a submitted form.
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Outcome of a product form submission. On failure the submitted form is
/// echoed back so it can be re-presented.
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub ok: bool,
    pub flash: Flash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<ProductForm>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub rows: Vec<Product>,
    pub total_price: f64,
    pub total_quantity: i64,
    pub filters: ProductFilter,
}

impl ReportResponse {
    pub fn new(report: ProductReport, filters: ProductFilter) -> Self {
        Self {
            rows: report.rows,
            total_price: report.total_price,
            total_quantity: report.total_quantity,
            filters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResponse {
    pub fn created(created: usize) -> Self {
        Self {
            ok: true,
            created: Some(created),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            created: None,
            error: Some(error.into()),
        }
    }
}
