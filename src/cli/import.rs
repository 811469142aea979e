//! Import command

use std::path::PathBuf;

use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_warnings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::BudgetCategory;
use crate::services::table::{ImportRequest, TableService};
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Source file (.xlsx, .xls, .ods or .csv)
    pub file: PathBuf,

    /// Category of the imported rows: misiones or consultorias
    #[arg(short, long)]
    pub category: BudgetCategory,

    /// Unit to store the table under (default: sheet or file name)
    #[arg(short, long, conflicts_with = "all_sheets")]
    pub unit: Option<String>,

    /// Worksheet to read (default: the first)
    #[arg(short, long, conflicts_with = "all_sheets")]
    pub sheet: Option<String>,

    /// Import every worksheet as its own unit
    #[arg(long)]
    pub all_sheets: bool,
}

pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> BudgetResult<()> {
    let service = TableService::new(storage, settings);
    let report = service.import(&ImportRequest {
        path: &args.file,
        category: args.category,
        unit: args.unit,
        sheet: args.sheet,
        all_sheets: args.all_sheets,
    })?;

    for table in &report.tables {
        println!(
            "Imported {} ({} rows, total {})",
            table.key(),
            table.len(),
            table.grand_total().format_with_symbol(&settings.currency_symbol)
        );
    }
    eprint!("{}", format_warnings(&report.warnings()));

    if report.tables.is_empty() {
        return Err(BudgetError::Import(format!(
            "No tables imported from {}",
            args.file.display()
        )));
    }
    Ok(())
}
