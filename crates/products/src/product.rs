use serde::{Deserialize, Serialize};

use motorshop_core::{InventoryError, InventoryResult, ProductId};

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl Product {
    /// Attach a store-assigned id to a validated candidate.
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            price: new.price,
            quantity: new.quantity,
        }
    }
}

/// Longest name or category a spreadsheet cell can hold, in characters.
pub const MAX_TEXT_CHARS: usize = 32_767;

/// Largest quantity magnitude that survives a spreadsheet number cell (2^53 - 1).
pub const MAX_QUANTITY: i64 = (1 << 53) - 1;

/// Creation candidate: a product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }

    /// Normalize and check the candidate before it is persisted.
    ///
    /// Name and category are trimmed, must be non-empty and fit in one
    /// spreadsheet cell. Price must be finite. Quantity must stay within
    /// [`MAX_QUANTITY`] so an exported value reads back unchanged. Sign is not
    /// checked for either price or quantity.
    pub fn validate(self) -> InventoryResult<Self> {
        let name = required_text("name", &self.name)?;
        let category = required_text("category", &self.category)?;
        if !self.price.is_finite() {
            return Err(InventoryError::validation("price must be a finite number"));
        }
        if self.quantity.unsigned_abs() > MAX_QUANTITY as u64 {
            return Err(InventoryError::validation(format!(
                "quantity must be between -{MAX_QUANTITY} and {MAX_QUANTITY}"
            )));
        }
        Ok(Self {
            name,
            category,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

fn required_text(field: &str, value: &str) -> InventoryResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InventoryError::validation(format!("{field} is required")));
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(InventoryError::validation(format!(
            "{field} must be at most {MAX_TEXT_CHARS} characters"
        )));
    }
    Ok(value.to_string())
}

/// Raw product submission as received from an HTML form.
///
/// Every field arrives as text; [`ProductForm::parse`] performs the number
/// conversions before anything reaches the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
}

impl ProductForm {
    pub fn parse(&self) -> InventoryResult<NewProduct> {
        let price_raw = self.price.trim();
        if price_raw.is_empty() {
            return Err(InventoryError::validation("price is required"));
        }
        let price = price_raw
            .parse::<f64>()
            .map_err(|_| InventoryError::validation(format!("price must be a number, got {price_raw:?}")))?;

        let quantity_raw = self.quantity.trim();
        if quantity_raw.is_empty() {
            return Err(InventoryError::validation("quantity is required"));
        }
        let quantity = quantity_raw.parse::<i64>().map_err(|_| {
            InventoryError::validation(format!("quantity must be a whole number, got {quantity_raw:?}"))
        })?;

        NewProduct::new(self.name.clone(), self.category.clone(), price, quantity).validate()
    }
}
