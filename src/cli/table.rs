//! Commands that view or change stored tables

use clap::Subcommand;

use super::args::{parse_assignment, TableArgs};
use crate::config::settings::Settings;
use crate::display::{format_table, format_table_list};
use crate::error::BudgetResult;
use crate::models::Field;
use crate::services::table::TableService;
use crate::storage::Storage;

/// Row editing subcommands
#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Set one cell; the row total is recomputed
    Set {
        #[command(flatten)]
        table: TableArgs,
        /// Row index as shown by `show`
        #[arg(short, long)]
        row: usize,
        /// Field name or column header (e.g. days, "Monto Mensual")
        #[arg(short, long)]
        field: Field,
        /// New value; unparseable numbers become 0
        #[arg(short, long, allow_hyphen_values = true)]
        value: String,
    },

    /// Append a row from field=value pairs
    Add {
        #[command(flatten)]
        table: TableArgs,
        /// Values, e.g. country=Chile days=3
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove a row
    Remove {
        #[command(flatten)]
        table: TableArgs,
        #[arg(short, long)]
        row: usize,
    },
}

pub fn handle_tables_command(storage: &Storage, settings: &Settings) -> BudgetResult<()> {
    let tables = TableService::new(storage, settings).list()?;
    println!("{}", format_table_list(&tables, &settings.currency_symbol).trim_end());
    Ok(())
}

pub fn handle_show_command(
    storage: &Storage,
    settings: &Settings,
    table: TableArgs,
) -> BudgetResult<()> {
    let stored = TableService::new(storage, settings).get(&table.unit, table.category)?;
    print!("{}", format_table(&stored, settings.calculation.rounding));
    println!(
        "Grand total: {}",
        stored.grand_total().format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

pub fn handle_edit_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EditCommands,
) -> BudgetResult<()> {
    let service = TableService::new(storage, settings);
    let symbol = &settings.currency_symbol;

    match cmd {
        EditCommands::Set {
            table,
            row,
            field,
            value,
        } => {
            let edit = service.set_field(&table.unit, table.category, row, field, &value)?;
            println!(
                "Row {}: {} {} -> {}",
                edit.row, edit.field, edit.before, edit.after
            );
            println!(
                "Row total {} -> {}",
                edit.total_before.format_with_symbol(symbol),
                edit.total_after.format_with_symbol(symbol)
            );
        }
        EditCommands::Add { table, values } => {
            let values = values
                .iter()
                .map(|v| parse_assignment(v))
                .collect::<BudgetResult<Vec<_>>>()?;
            let index = service.add_row(&table.unit, table.category, &values)?;
            let stored = service.get(&table.unit, table.category)?;
            println!(
                "Added row {} (total {})",
                index,
                stored.row(index)?.total.format_with_symbol(symbol)
            );
        }
        EditCommands::Remove { table, row } => {
            let removed = service.remove_row(&table.unit, table.category, row)?;
            println!(
                "Removed row {} (total {})",
                row,
                removed.total.format_with_symbol(symbol)
            );
        }
    }
    Ok(())
}

pub fn handle_recompute_command(
    storage: &Storage,
    settings: &Settings,
    table: TableArgs,
) -> BudgetResult<()> {
    let service = TableService::new(storage, settings);
    let changed = service.recompute(&table.unit, table.category)?;
    let stored = service.get(&table.unit, table.category)?;
    println!(
        "Recomputed {}: {} row total(s) changed, grand total {}",
        stored.key(),
        changed,
        stored.grand_total().format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

pub fn handle_remove_command(
    storage: &Storage,
    settings: &Settings,
    table: TableArgs,
) -> BudgetResult<()> {
    if TableService::new(storage, settings).remove(&table.unit, table.category)? {
        println!("Removed {}/{}", table.unit, table.category);
    } else {
        println!("No {} table stored for {}", table.category, table.unit);
    }
    Ok(())
}
