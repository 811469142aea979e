//! User settings for budgetline
//!
//! Holds the calculation policy applied to every table and the desired
//! amounts each table is reconciled against.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetCategory, Money, Rounding};
use crate::services::calculator::{CalculationConfig, MissionFormula};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Desired amount for one unit and category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAmount {
    pub unit: String,
    pub category: BudgetCategory,
    pub amount: Money,
}

/// User settings for budgetline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    #[serde(default)]
    pub calculation: CalculationConfig,

    /// Desired amounts, at most one per unit and category
    #[serde(default)]
    pub targets: Vec<TargetAmount>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            calculation: CalculationConfig::default(),
            targets: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Defaults are not written; the caller decides when to persist.
    pub fn load_or_create(paths: &BudgetPaths) -> BudgetResult<Self> {
        let settings: Settings = read_json(paths.settings_file())
            .map_err(|e| BudgetError::Config(format!("Failed to load settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> BudgetResult<()> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject multipliers that would corrupt totals
    pub fn validate(&self) -> BudgetResult<()> {
        let calc = &self.calculation;
        check_overhead("overhead_multiplier", calc.overhead_multiplier)?;
        for (unit, value) in &calc.unit_overhead {
            check_overhead(&format!("overhead.{}", unit), *value)?;
        }
        Ok(())
    }

    /// Desired amount for a table, if one is set
    pub fn desired_for(&self, unit: &str, category: BudgetCategory) -> Option<Money> {
        self.targets
            .iter()
            .find(|t| t.unit == unit && t.category == category)
            .map(|t| t.amount)
    }

    /// Set or replace the desired amount for a table
    pub fn set_target(&mut self, unit: &str, category: BudgetCategory, amount: Money) {
        match self
            .targets
            .iter_mut()
            .find(|t| t.unit == unit && t.category == category)
        {
            Some(target) => target.amount = amount,
            None => self.targets.push(TargetAmount {
                unit: unit.to_string(),
                category,
                amount,
            }),
        }
    }

    /// Remove a desired amount; returns whether one existed
    pub fn clear_target(&mut self, unit: &str, category: BudgetCategory) -> bool {
        let before = self.targets.len();
        self.targets
            .retain(|t| !(t.unit == unit && t.category == category));
        self.targets.len() != before
    }

    /// Set one setting from its command-line name
    ///
    /// Keys: `formula_variant`, `overhead_multiplier`, `overhead.<UNIT>`,
    /// `rounding`, `trust_existing_total`, `currency_symbol`.
    pub fn set_value(&mut self, key: &str, value: &str) -> BudgetResult<()> {
        let calc = &mut self.calculation;
        match key {
            "formula_variant" | "formula" => {
                calc.formula_variant = value
                    .parse::<MissionFormula>()
                    .map_err(BudgetError::Validation)?;
            }
            "overhead_multiplier" | "overhead" => {
                let parsed = parse_overhead(key, value)?;
                calc.overhead_multiplier = parsed;
            }
            "rounding" => {
                calc.rounding = value.parse::<Rounding>().map_err(BudgetError::Validation)?;
            }
            "trust_existing_total" => {
                calc.trust_existing_total = parse_bool(value)?;
            }
            "currency_symbol" => {
                self.currency_symbol = value.to_string();
            }
            other => match other.strip_prefix("overhead.") {
                Some(unit) if !unit.is_empty() => {
                    let parsed = parse_overhead(key, value)?;
                    calc.unit_overhead.insert(unit.to_string(), parsed);
                }
                _ => {
                    return Err(BudgetError::Validation(format!(
                        "Unknown setting '{}'",
                        other
                    )))
                }
            },
        }
        Ok(())
    }
}

fn check_overhead(key: &str, value: f64) -> BudgetResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BudgetError::Validation(format!(
            "{} must be a non-negative number, got {}",
            key, value
        )))
    }
}

fn parse_overhead(key: &str, value: &str) -> BudgetResult<f64> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        BudgetError::Validation(format!("{} must be a number, got '{}'", key, value))
    })?;
    check_overhead(key, parsed)?;
    Ok(parsed)
}

fn parse_bool(value: &str) -> BudgetResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(BudgetError::Validation(format!(
            "Expected true or false, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.calculation.formula_variant, MissionFormula::Additive);
        assert!(settings.calculation.trust_existing_total);
        assert!(settings.targets.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_value("formula_variant", "factored").unwrap();
        settings.set_value("overhead.VPO", "1.6").unwrap();
        settings.set_target("VPO", BudgetCategory::Consulting, Money::from_units(30000));
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.calculation.overhead_for("VPO"), 1.6);
        assert_eq!(
            loaded.desired_for("VPO", BudgetCategory::Consulting),
            Some(Money::from_units(30000))
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"calculation": {"rounding": "two_decimal"}}"#).unwrap();
        assert_eq!(settings.calculation.rounding, Rounding::TwoDecimal);
        assert!(settings.calculation.trust_existing_total);
        assert_eq!(settings.calculation.overhead_multiplier, 1.0);
    }

    #[test]
    fn test_targets_replace_and_clear() {
        let mut settings = Settings::default();
        settings.set_target("VPO", BudgetCategory::Missions, Money::from_units(100));
        settings.set_target("VPO", BudgetCategory::Missions, Money::from_units(200));
        assert_eq!(settings.targets.len(), 1);
        assert_eq!(
            settings.desired_for("VPO", BudgetCategory::Missions),
            Some(Money::from_units(200))
        );
        assert_eq!(settings.desired_for("VPO", BudgetCategory::Consulting), None);

        assert!(settings.clear_target("VPO", BudgetCategory::Missions));
        assert!(!settings.clear_target("VPO", BudgetCategory::Missions));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set_value("overhead_multiplier", "-1").is_err());
        assert!(settings.set_value("overhead.VPO", "NaN").is_err());
        assert!(settings.set_value("trust_existing_total", "maybe").is_err());
        assert!(settings.set_value("colour", "blue").is_err());

        settings.set_value("trust_existing_total", "no").unwrap();
        assert!(!settings.calculation.trust_existing_total);
    }
}
