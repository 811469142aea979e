//! Desired-amount (target) commands

use clap::Subcommand;

use super::args::{parse_amount, TableArgs};
use crate::audit::{AuditEntry, EntityType};
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum TargetCommands {
    /// Set the desired amount for a table
    Set {
        #[command(flatten)]
        table: TableArgs,
        /// Amount, e.g. 15000 or "15,000.50"
        amount: String,
    },

    /// List all desired amounts
    List,

    /// Remove the desired amount for a table
    Clear {
        #[command(flatten)]
        table: TableArgs,
    },
}

pub fn handle_target_command(
    storage: &Storage,
    paths: &BudgetPaths,
    settings: &mut Settings,
    cmd: TargetCommands,
) -> BudgetResult<()> {
    match cmd {
        TargetCommands::Set { table, amount } => {
            let amount = parse_amount(&amount)?;
            let previous = settings.desired_for(&table.unit, table.category);
            settings.set_target(&table.unit, table.category, amount);
            settings.save(paths)?;

            let id = format!("{}/{}", table.unit, table.category);
            let entry = match previous {
                Some(before) => AuditEntry::update(
                    EntityType::Target,
                    id,
                    None,
                    &before,
                    &amount,
                    Some(format!("{} -> {}", before, amount)),
                ),
                None => AuditEntry::create(EntityType::Target, id, None, &amount),
            };
            storage.log(&entry)?;

            println!(
                "Desired amount for {}/{} set to {}",
                table.unit,
                table.category,
                amount.format_with_symbol(&settings.currency_symbol)
            );
        }
        TargetCommands::List => {
            if settings.targets.is_empty() {
                println!("No desired amounts set.");
            }
            for target in &settings.targets {
                println!(
                    "{:<16} {:<12} {:>16}",
                    target.unit,
                    target.category.to_string(),
                    target.amount.format_with_symbol(&settings.currency_symbol)
                );
            }
        }
        TargetCommands::Clear { table } => {
            let previous = settings.desired_for(&table.unit, table.category);
            if let Some(amount) = previous {
                settings.clear_target(&table.unit, table.category);
                settings.save(paths)?;
                storage.log(&AuditEntry::delete(
                    EntityType::Target,
                    format!("{}/{}", table.unit, table.category),
                    None,
                    &amount,
                ))?;
                println!("Cleared desired amount for {}/{}", table.unit, table.category);
            } else {
                println!("No desired amount set for {}/{}", table.unit, table.category);
            }
        }
    }
    Ok(())
}
