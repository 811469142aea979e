//! Settings commands

use clap::Subcommand;

use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::services::table::TableService;
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and calculation settings
    Show,

    /// Change a setting
    ///
    /// Keys: formula_variant (additive|factored), overhead_multiplier,
    /// overhead.<UNIT>, rounding (integer|two_decimal),
    /// trust_existing_total (true|false), currency_symbol
    Set { key: String, value: String },
}

pub fn handle_config_command(
    storage: &Storage,
    paths: &BudgetPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> BudgetResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let calc = &settings.calculation;
            println!("budgetline configuration");
            println!("========================");
            println!("Data directory:    {}", paths.base_dir().display());
            println!("Tables directory:  {}", paths.tables_dir().display());
            println!("Exports directory: {}", paths.exports_dir().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("formula_variant:      {}", calc.formula_variant);
            println!("overhead_multiplier:  {}", calc.overhead_multiplier);
            for (unit, value) in &calc.unit_overhead {
                println!("overhead.{:<12} {}", format!("{}:", unit), value);
            }
            println!("rounding:             {}", calc.rounding);
            println!("trust_existing_total: {}", calc.trust_existing_total);
            println!("currency_symbol:      {}", settings.currency_symbol);
        }
        ConfigCommands::Set { key, value } => {
            let before = serde_json::to_value(&*settings)?;
            settings.set_value(&key, &value)?;
            settings.save(paths)?;
            let after = serde_json::to_value(&*settings)?;

            storage.log(&AuditEntry::update(
                EntityType::Settings,
                "config",
                Some(key.clone()),
                &before,
                &after,
                generate_diff(&before["calculation"], &after["calculation"])
                    .or_else(|| generate_diff(&before, &after)),
            ))?;
            println!("Set {} = {}", key, value);

            if affects_totals(&key) {
                let rewritten = TableService::new(storage, settings).settle_all()?;
                if rewritten > 0 {
                    println!("Updated totals in {} stored table(s)", rewritten);
                }
            }
        }
    }
    Ok(())
}

/// Settings keys that change how totals are computed or rounded
fn affects_totals(key: &str) -> bool {
    matches!(
        key,
        "formula_variant"
            | "formula"
            | "overhead_multiplier"
            | "overhead"
            | "rounding"
            | "trust_existing_total"
    ) || key.starts_with("overhead.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affects_totals() {
        assert!(affects_totals("formula_variant"));
        assert!(affects_totals("overhead.VPO"));
        assert!(affects_totals("rounding"));
        assert!(!affects_totals("currency_symbol"));
    }
}
