//! Error model shared by the store, the tabular codec and the HTTP surface.

use thiserror::Error;

/// Result type used across the inventory crates.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory-level error.
///
/// Every failure the application surfaces to a caller is one of these variants.
/// Use [`InventoryError::public_message`] for anything that leaves the process;
/// `Storage` details are for logs only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InventoryError {
    /// A required field was missing or not convertible while creating a product.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A cell of an imported spreadsheet could not be coerced to its field type.
    #[error("row {row}, column {field}: {message}")]
    Conversion {
        /// 1-based spreadsheet row number.
        row: usize,
        field: &'static str,
        message: String,
    },

    /// The uploaded spreadsheet lacks required columns or is unreadable.
    #[error("{0}")]
    Schema(String),

    /// The persistence layer failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Coarse error classification used for status mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Schema,
    Storage,
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conversion(row: usize, field: &'static str, msg: impl Into<String>) -> Self {
        Self::Conversion {
            row,
            field,
            message: msg.into(),
        }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Conversion { .. } => ErrorKind::Validation,
            Self::Schema(_) => ErrorKind::Schema,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Message that is safe to show to an end user.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => "storage failure; no changes were saved".to_string(),
            other => other.to_string(),
        }
    }
}
