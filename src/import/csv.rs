//! CSV source reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use super::RawTable;
use crate::error::{BudgetError, BudgetResult};
use crate::models::RawCell;

/// Read a CSV table from any reader; the first record is the header row
pub fn read_csv<R: Read>(reader: R, name: &str) -> BudgetResult<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let mut table = RawTable::new(name, headers);

    for (line, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| {
            BudgetError::Import(format!("{}: bad record at row {}: {}", name, line + 1, e))
        })?;
        table.rows.push(record.iter().map(RawCell::from_text).collect());
    }

    Ok(table)
}

/// Read a CSV file, naming the table after the file stem
pub fn read_csv_path(path: &Path) -> BudgetResult<RawTable> {
    let file = File::open(path)
        .map_err(|e| BudgetError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("csv")
        .to_string();
    read_csv(file, &name)
}
