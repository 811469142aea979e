//! Summary and reconciliation commands

use clap::Args;

use super::args::{parse_amount, TableArgs};
use crate::config::settings::Settings;
use crate::display::{format_group_detail, format_reconciliation, format_summary, format_warnings};
use crate::error::{BudgetError, BudgetResult};
use crate::services::aggregate::GroupKey;
use crate::services::table::TableService;
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Group by one or more keys (country, objective, area, org_unit, type, role)
    #[arg(short, long, value_delimiter = ',')]
    pub by: Vec<GroupKey>,

    /// List the rows of each group
    #[arg(short, long, requires = "by")]
    pub detail: bool,

    /// Desired amount to reconcile against (default: the saved target)
    #[arg(long)]
    pub desired: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Desired amount (default: the saved target)
    #[arg(long)]
    pub desired: Option<String>,
}

pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
) -> BudgetResult<()> {
    let desired = args.desired.as_deref().map(parse_amount).transpose()?;
    let (table, summary) = TableService::new(storage, settings).summarize(
        &args.table.unit,
        args.table.category,
        &args.by,
        desired,
    )?;

    let symbol = &settings.currency_symbol;
    print!("{}", format_summary(&summary, symbol));

    if args.detail {
        if let Some(groups) = &summary.groups {
            println!();
            print!(
                "{}",
                format_group_detail(&table, groups, settings.calculation.rounding, symbol)
            );
        }
    }
    Ok(())
}

pub fn handle_reconcile_command(
    storage: &Storage,
    settings: &Settings,
    args: ReconcileArgs,
) -> BudgetResult<()> {
    let desired = args.desired.as_deref().map(parse_amount).transpose()?;
    let (table, summary) =
        TableService::new(storage, settings).summarize(&args.table.unit, args.table.category, &[], desired)?;

    let result = summary.reconciliation.ok_or_else(|| {
        BudgetError::Validation(format!(
            "No desired amount for {}; pass --desired or run `budgetline target set`",
            table.key()
        ))
    })?;

    println!("Reconciliation for {}", table.key());
    print!("{}", format_reconciliation(&result, &settings.currency_symbol));
    eprint!("{}", format_warnings(&summary.warnings));
    Ok(())
}
