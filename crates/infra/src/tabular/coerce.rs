//! Typed coercion of spreadsheet cells.
//!
//! Cells arrive with whatever type the spreadsheet stored. Each field goes
//! through one explicit conversion that either yields the field's type or a
//! `Conversion` error naming the row and column.

use std::borrow::Cow;

use calamine::Data;

use motorshop_core::{InventoryError, InventoryResult};

/// A cell reduced to the shapes the importer cares about.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell<'a> {
    Empty,
    Text(&'a str),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(String),
}

impl<'a> From<&'a Data> for Cell<'a> {
    fn from(data: &'a Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            other => Cell::Other(other.to_string()),
        }
    }
}

impl Cell<'_> {
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Cell::Empty => "an empty cell".to_string(),
            Cell::Text(s) => format!("{s:?}"),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Other(s) => format!("{s:?}"),
        }
    }

    /// Header text, untrimmed. `None` for empty cells.
    pub(crate) fn header(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(unescape(s).into_owned()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Other(s) => Some(s.clone()),
        }
    }

    /// Text field: any non-empty value rendered as text, trimmed.
    pub(crate) fn text(&self, row: usize, field: &'static str) -> InventoryResult<String> {
        let value = match self {
            Cell::Empty => String::new(),
            other => other.header().unwrap_or_default(),
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(InventoryError::conversion(row, field, "value is required"));
        }
        Ok(value.to_string())
    }

    /// Number field: numeric cells or numeric text.
    pub(crate) fn number(&self, row: usize, field: &'static str) -> InventoryResult<f64> {
        let value = match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty => return Err(InventoryError::conversion(row, field, "value is required")),
            Cell::Bool(_) | Cell::Other(_) => None,
        };
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(InventoryError::conversion(
                row,
                field,
                format!("expected a number, found {}", self.describe()),
            )),
        }
    }

    /// Whole-number field. Fractional values are rejected, never truncated.
    pub(crate) fn integer(&self, row: usize, field: &'static str) -> InventoryResult<i64> {
        let value = match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) => integral(*f),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            Cell::Empty => return Err(InventoryError::conversion(row, field, "value is required")),
            Cell::Bool(_) | Cell::Other(_) => None,
        };
        value.ok_or_else(|| {
            InventoryError::conversion(
                row,
                field,
                format!("expected a whole number, found {}", self.describe()),
            )
        })
    }
}

/// Undo the OOXML `_xHHHH_` escaping that writers apply to control
/// characters and to literal `_xHHHH_` text (written as `_x005F_xHHHH_`).
///
/// Escapes are decoded left to right and never re-scanned, so `_x005F_x0041_`
/// becomes the literal `_x0041_`.
pub(crate) fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match escaped_char(tail) {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push('_');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// `_xHHHH_` at the start of `s`, decoded.
fn escaped_char(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[6] != b'_' || !bytes[2..6].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let code = u32::from_str_radix(&s[2..6], 16).ok()?;
    char::from_u32(code)
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_required() {
        assert_eq!(Cell::Text("  Oil  ").text(2, "Name").unwrap(), "Oil");
        assert_eq!(Cell::Int(42).text(2, "Name").unwrap(), "42");
        let err = Cell::Text("   ").text(5, "Name").unwrap_err();
        assert_eq!(err, InventoryError::conversion(5, "Name", "value is required"));
    }

    #[test]
    fn numbers_accept_numeric_cells_and_text() {
        assert_eq!(Cell::Float(12.5).number(2, "Price").unwrap(), 12.5);
        assert_eq!(Cell::Int(3).number(2, "Price").unwrap(), 3.0);
        assert_eq!(Cell::Text(" 7.25 ").number(2, "Price").unwrap(), 7.25);
    }

    #[test]
    fn numbers_reject_other_shapes() {
        let err = Cell::Text("cheap").number(4, "Price").unwrap_err();
        match err {
            InventoryError::Conversion { row, field, message } => {
                assert_eq!(row, 4);
                assert_eq!(field, "Price");
                assert!(message.contains("cheap"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Cell::Bool(true).number(2, "Price").is_err());
        assert!(Cell::Text("NaN").number(2, "Price").is_err());
        assert!(Cell::Empty.number(2, "Price").is_err());
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(Cell::Float(100.0).integer(2, "Quantity").unwrap(), 100);
        assert_eq!(Cell::Text("5").integer(2, "Quantity").unwrap(), 5);
        assert_eq!(Cell::Text("5.0").integer(2, "Quantity").unwrap(), 5);
        assert!(Cell::Float(2.5).integer(2, "Quantity").is_err());
        assert!(Cell::Float(1e300).integer(2, "Quantity").is_err());
        assert!(Cell::Text("two").integer(2, "Quantity").is_err());
    }

    #[test]
    fn escaped_characters_are_decoded() {
        assert_eq!(unescape("a_x000D_\nb"), "a\r\nb");
        assert_eq!(unescape("_x005F_x0041_ plug"), "_x0041_ plug");
        assert_eq!(unescape("_x0041_"), "A");
        assert_eq!(unescape("plain_name"), "plain_name");
        assert_eq!(unescape("_x12_ _xZZZZ_ _x"), "_x12_ _xZZZZ_ _x");
        // Lone surrogates are not characters; leave them as written.
        assert_eq!(unescape("_xD800_"), "_xD800_");
        assert_eq!(Cell::Text("a_x000D_b").text(2, "Name").unwrap(), "a\rb");
    }

    #[test]
    fn blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text(" ").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }
}
