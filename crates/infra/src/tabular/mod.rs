//! Spreadsheet (xlsx) export and import of products.
//!
//! Export writes one `Report` worksheet with the fixed header
//! `ID, Name, Category, Price, Quantity`. Import reads the first worksheet,
//! uses its first row as the header, and turns every following non-blank row
//! into a creation candidate. Import is all-or-nothing: one bad cell rejects
//! the whole file.

mod coerce;

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use motorshop_core::{InventoryError, InventoryResult};
use motorshop_products::{NewProduct, Product};

use coerce::Cell;

/// Export header, in column order.
pub const EXPORT_HEADER: [&str; 5] = ["ID", "Name", "Category", "Price", "Quantity"];

/// Columns an import must provide, sorted alphabetically.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Category", "Name", "Price", "Quantity"];

pub const SHEET_NAME: &str = "Report";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Encode products as an xlsx workbook.
pub fn encode(rows: &[Product]) -> InventoryResult<Vec<u8>> {
    write_workbook(rows).map_err(|e| InventoryError::storage(format!("failed to write spreadsheet: {e}")))
}

fn write_workbook(rows: &[Product]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (idx, product) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, product.id.get() as f64)?;
        sheet.write_string(row, 1, product.name.as_str())?;
        sheet.write_string(row, 2, product.category.as_str())?;
        sheet.write_number(row, 3, product.price)?;
        sheet.write_number(row, 4, product.quantity as f64)?;
    }

    workbook.save_to_buffer()
}

/// Decode an uploaded xlsx workbook into creation candidates, in row order.
pub fn decode(bytes: &[u8]) -> InventoryResult<Vec<NewProduct>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(|e| {
        tracing::debug!(error = %e, "upload is not an xlsx workbook");
        InventoryError::schema("file is not a readable spreadsheet")
    })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            tracing::debug!(error = %e, "failed to read first worksheet");
            return Err(InventoryError::schema("file is not a readable spreadsheet"));
        }
        None => return Err(missing_columns(&REQUIRED_COLUMNS)),
    };

    // Spreadsheet row number (1-based) of the first row in the range.
    let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let header: Vec<Cell<'_>> = match rows.next() {
        Some(cells) => cells.iter().map(Cell::from).collect(),
        None => return Err(missing_columns(&REQUIRED_COLUMNS)),
    };
    let columns = Columns::locate(&header)?;

    let mut candidates = Vec::new();
    for (offset, cells) in rows.enumerate() {
        let row_number = first_row + offset + 1;
        let cells: Vec<Cell<'_>> = cells.iter().map(Cell::from).collect();
        if cells.iter().all(Cell::is_blank) {
            continue;
        }
        candidates.push(columns.candidate(&cells, row_number)?);
    }

    tracing::debug!(rows = candidates.len(), "decoded spreadsheet");
    Ok(candidates)
}

/// Positions of the required columns inside a header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    category: usize,
    price: usize,
    quantity: usize,
}

impl Columns {
    fn locate(header: &[Cell<'_>]) -> InventoryResult<Self> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, cell) in header.iter().enumerate() {
            if let Some(title) = cell.header() {
                positions.entry(title).or_insert(idx);
            }
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !positions.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(missing_columns(&missing));
        }

        Ok(Self {
            name: positions["Name"],
            category: positions["Category"],
            price: positions["Price"],
            quantity: positions["Quantity"],
        })
    }

    fn candidate(&self, cells: &[Cell<'_>], row: usize) -> InventoryResult<NewProduct> {
        let at = |idx: usize| cells.get(idx).cloned().unwrap_or(Cell::Empty);
        Ok(NewProduct {
            name: at(self.name).text(row, "Name")?,
            category: at(self.category).text(row, "Category")?,
            price: at(self.price).number(row, "Price")?,
            quantity: at(self.quantity).integer(row, "Quantity")?,
        })
    }
}

fn missing_columns(missing: &[&str]) -> InventoryError {
    let mut missing = missing.to_vec();
    missing.sort_unstable();
    InventoryError::schema(format!(
        "missing columns: {}; required: {}",
        missing.join(", "),
        REQUIRED_COLUMNS.join(", ")
    ))
}
