//! Excel/ODS worksheet reader using calamine
//!
//! The first non-empty row of a sheet is taken as the header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::{RawTable, SourceTables};
use crate::error::{BudgetError, BudgetResult};
use crate::models::RawCell;

/// Read one worksheet; `None` selects the first sheet
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> BudgetResult<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BudgetError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

    let names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| BudgetError::SheetNotFound {
                sheet: wanted.to_string(),
                path: path.display().to_string(),
            })?,
        None => names.first().cloned().ok_or_else(|| {
            BudgetError::Import(format!("{} contains no worksheets", path.display()))
        })?,
    };

    let range = workbook.worksheet_range(&name)?;
    Ok(range_to_table(&name, &range))
}

/// Read every worksheet in workbook order
///
/// A sheet that cannot be read is recorded and the remaining sheets are
/// still read.
pub fn read_all_sheets(path: &Path) -> BudgetResult<SourceTables> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| BudgetError::Import(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut source = SourceTables::default();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => source.tables.push(range_to_table(&name, &range)),
            Err(err) => source.failed.push((name, err.into())),
        }
    }
    Ok(source)
}

fn range_to_table(name: &str, range: &Range<Data>) -> RawTable {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect::<Vec<_>>())
        .skip_while(|cells| cells.iter().all(RawCell::is_empty));

    let headers = rows
        .next()
        .map(|cells| cells.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let mut table = RawTable::new(name, headers);
    table.rows = rows.collect();
    table
}

fn data_to_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::String(s) => RawCell::from_text(s),
        Data::Error(_) => RawCell::Empty,
        other => RawCell::from_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Int(3)), RawCell::Number(3.0));
        assert_eq!(data_to_cell(&Data::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(data_to_cell(&Data::String("  ".into())), RawCell::Empty);
        assert_eq!(
            data_to_cell(&Data::String("Chile".into())),
            RawCell::Text("Chile".into())
        );
        assert_eq!(data_to_cell(&Data::Empty), RawCell::Empty);
    }

    #[test]
    fn test_range_header_skips_leading_blank_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((1, 0), Data::String("País".into()));
        range.set_value((1, 1), Data::String("Total".into()));
        range.set_value((2, 0), Data::String("Chile".into()));
        range.set_value((2, 1), Data::Float(640.0));

        let table = range_to_table("VPO", &range);
        assert_eq!(table.headers, vec!["País".to_string(), "Total".to_string()]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], RawCell::Number(640.0));
    }

    #[test]
    fn test_missing_workbook() {
        let err = read_sheet(Path::new("/nonexistent/BDD_Ajuste.xlsx"), None).unwrap_err();
        assert!(matches!(err, BudgetError::Import(_)));
    }
}
