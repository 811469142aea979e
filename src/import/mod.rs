//! Tabular source loading
//!
//! Sources (worksheets or CSV files) are first read into a [`RawTable`] of
//! untyped cells, then bound to a category's fields and normalized into a
//! [`BudgetTable`]. Binding is where missing required columns are detected;
//! that error is fatal for the one table only.

pub mod csv;
pub mod workbook;

use std::path::Path;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetCategory, BudgetTable, Column, Field, LineItem, Money, RawCell, Rounding};
use crate::services::normalize::{assign_cell, normalize_number, normalize_text};

/// A source table before typing: a header row and data rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Sheet or file name, used in error messages
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }
}

/// Every table read from a source, plus the sheets that could not be read
#[derive(Debug, Default)]
pub struct SourceTables {
    pub tables: Vec<RawTable>,
    /// Unreadable sheets, by name
    pub failed: Vec<(String, BudgetError)>,
}

impl From<RawTable> for SourceTables {
    fn from(table: RawTable) -> Self {
        Self {
            tables: vec![table],
            failed: Vec::new(),
        }
    }
}

/// Supported source formats, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> BudgetResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            _ => Err(BudgetError::Import(format!(
                "Unsupported file type: {}",
                path.display()
            ))),
        }
    }
}

/// Read one table from a source file
///
/// For workbooks, `sheet` selects a worksheet (default: the first one).
pub fn read_source(path: &Path, sheet: Option<&str>) -> BudgetResult<RawTable> {
    match SourceFormat::detect(path)? {
        SourceFormat::Csv => self::csv::read_csv_path(path),
        SourceFormat::Workbook => workbook::read_sheet(path, sheet),
    }
}

/// Read every table from a source file (one per worksheet; CSV yields one)
///
/// Fails only when the file itself cannot be opened; a worksheet that cannot
/// be read is listed in [`SourceTables::failed`].
pub fn read_all(path: &Path) -> BudgetResult<SourceTables> {
    match SourceFormat::detect(path)? {
        SourceFormat::Csv => Ok(self::csv::read_csv_path(path)?.into()),
        SourceFormat::Workbook => workbook::read_all_sheets(path),
    }
}

/// Bind source headers to fields of a category
///
/// Unrecognized headers, and repeats of an already bound field, are kept as
/// extra columns. Fails with [`BudgetError::MissingField`] naming the first
/// required field that no header provides.
pub fn bind_columns(raw: &RawTable, category: BudgetCategory) -> BudgetResult<Vec<Column>> {
    let mut columns: Vec<Column> = Vec::with_capacity(raw.headers.len());

    for header in &raw.headers {
        let field = Field::from_header(header, category)
            .filter(|f| !columns.iter().any(|c| c.field == Some(*f)));
        columns.push(Column {
            header: header.trim().to_string(),
            field,
        });
    }

    for required in Field::required_for(category) {
        if !columns.iter().any(|c| c.field == Some(*required)) {
            return Err(BudgetError::missing_field(&raw.name, required.name()));
        }
    }

    Ok(columns)
}

/// Build a typed table from a raw one
///
/// Totals hold the source `Total` column (or zero), also kept exactly as
/// `source_total`; the caller applies the load-time total policy afterwards.
/// Fully blank rows are skipped.
pub fn build_table(raw: &RawTable, unit: &str, category: BudgetCategory) -> BudgetResult<BudgetTable> {
    let columns = bind_columns(raw, category)?;
    let mut table = BudgetTable::with_columns(raw.name.clone(), unit, category, columns);

    for cells in &raw.rows {
        if cells.iter().all(RawCell::is_empty) {
            continue;
        }

        let mut item = LineItem::blank(category);
        for (column, cell) in table.columns.iter().zip(cells) {
            match column.field {
                Some(Field::Total) => {
                    item.total = Money::from_f64(normalize_number(cell), Rounding::TwoDecimal);
                    item.source_total = Some(item.total);
                }
                Some(field) => {
                    assign_cell(&mut item, field, cell);
                }
                None => {
                    if let Some(text) = normalize_text(cell) {
                        item.extra.insert(column.header.clone(), text);
                    }
                }
            }
        }
        table.push(item)?;
    }

    Ok(table)
}
