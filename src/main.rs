use anyhow::Result;
use clap::{Parser, Subcommand};

use budgetline::cli::{
    handle_audit_command, handle_config_command, handle_edit_command, handle_export_command,
    handle_import_command, handle_recompute_command, handle_reconcile_command,
    handle_remove_command, handle_show_command, handle_summary_command, handle_tables_command,
    handle_target_command, ConfigCommands, EditCommands, ExportArgs, ImportArgs, ReconcileArgs,
    SummaryArgs, TableArgs, TargetCommands,
};
use budgetline::config::{paths::BudgetPaths, settings::Settings};
use budgetline::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budgetline",
    version,
    about = "Budget line-item totals, grouping and reconciliation",
    long_about = "budgetline imports Misiones and Consultorías budget tables from \
                  spreadsheets or CSV, recomputes line totals, groups them by \
                  country, objective and other keys, and reconciles the grand \
                  total against a desired amount."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import tables from a workbook or CSV file
    Import(ImportArgs),

    /// List stored tables
    #[command(alias = "ls")]
    Tables,

    /// Show a table's rows and totals
    Show(TableArgs),

    /// Totals, groups, cost components and reconciliation for a table
    Summary(SummaryArgs),

    /// Compare a table's grand total with its desired amount
    Reconcile(ReconcileArgs),

    /// Edit rows of a stored table
    #[command(subcommand)]
    Edit(EditCommands),

    /// Recompute every row total with the current settings
    Recompute(TableArgs),

    /// Delete a stored table
    Remove(TableArgs),

    /// Export a table or its summary
    Export(ExportArgs),

    /// Manage desired amounts
    #[command(subcommand)]
    Target(TargetCommands),

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BudgetPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Import(args)) => handle_import_command(&storage, &settings, args)?,
        Some(Commands::Tables) => handle_tables_command(&storage, &settings)?,
        Some(Commands::Show(table)) => handle_show_command(&storage, &settings, table)?,
        Some(Commands::Summary(args)) => handle_summary_command(&storage, &settings, args)?,
        Some(Commands::Reconcile(args)) => handle_reconcile_command(&storage, &settings, args)?,
        Some(Commands::Edit(cmd)) => handle_edit_command(&storage, &settings, cmd)?,
        Some(Commands::Recompute(table)) => handle_recompute_command(&storage, &settings, table)?,
        Some(Commands::Remove(table)) => handle_remove_command(&storage, &settings, table)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, &settings, args)?,
        Some(Commands::Target(cmd)) => {
            handle_target_command(&storage, &paths, &mut settings, cmd)?
        }
        Some(Commands::Config(cmd)) => {
            handle_config_command(&storage, &paths, &mut settings, cmd)?
        }
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        None => {
            println!("budgetline - budget line-item totals and reconciliation");
            println!();
            println!("Run 'budgetline --help' for usage information.");
        }
    }

    Ok(())
}
