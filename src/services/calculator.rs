//! Total calculator
//!
//! The only place a line-item total is evaluated. Mission tables use one of
//! two named formula strategies; consulting tables multiply headcount, monthly
//! amount and month count by a per-unit overhead multiplier.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{
    BudgetTable, ConsultingItem, LineData, LineItem, MissionItem, Money, Rounding, TotalSource,
};

/// Mission total formula strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissionFormula {
    /// `n*fare + n*days*lodging + n*days*per_diem + n*mobility`
    #[default]
    Additive,
    /// `(fare + (lodging + per_diem + mobility) * days) * n`
    Factored,
}

impl MissionFormula {
    /// Evaluate the formula on a normalized mission item
    pub fn evaluate(&self, item: &MissionItem) -> f64 {
        let n = item.staff_count;
        let days = item.days;
        match self {
            MissionFormula::Additive => {
                n * item.fare_cost
                    + n * days * item.lodging_cost
                    + n * days * item.per_diem_cost
                    + n * item.mobility_cost
            }
            MissionFormula::Factored => {
                (item.fare_cost
                    + (item.lodging_cost + item.per_diem_cost + item.mobility_cost) * days)
                    * n
            }
        }
    }
}

impl fmt::Display for MissionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionFormula::Additive => write!(f, "additive"),
            MissionFormula::Factored => write!(f, "factored"),
        }
    }
}

impl FromStr for MissionFormula {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "additive" | "a" => Ok(MissionFormula::Additive),
            "factored" | "b" => Ok(MissionFormula::Factored),
            other => Err(format!(
                "unknown formula variant '{}' (expected 'additive' or 'factored')",
                other
            )),
        }
    }
}

/// Options that control how totals are computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// Mission formula strategy
    #[serde(default)]
    pub formula_variant: MissionFormula,

    /// Consulting overhead multiplier for units without their own entry
    #[serde(default = "default_overhead")]
    pub overhead_multiplier: f64,

    /// Per-unit consulting overhead multipliers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unit_overhead: BTreeMap<String, f64>,

    /// Display precision for computed totals
    #[serde(default)]
    pub rounding: Rounding,

    /// Keep a non-zero source total at load time instead of recomputing it
    #[serde(default = "default_trust_existing_total")]
    pub trust_existing_total: bool,
}

fn default_overhead() -> f64 {
    1.0
}

fn default_trust_existing_total() -> bool {
    true
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            formula_variant: MissionFormula::default(),
            overhead_multiplier: default_overhead(),
            unit_overhead: BTreeMap::new(),
            rounding: Rounding::default(),
            trust_existing_total: default_trust_existing_total(),
        }
    }
}

impl CalculationConfig {
    /// Overhead multiplier applied to a unit's consulting totals
    pub fn overhead_for(&self, unit: &str) -> f64 {
        self.unit_overhead
            .get(unit)
            .copied()
            .unwrap_or(self.overhead_multiplier)
    }
}

/// Consulting total before rounding
pub fn consulting_total(item: &ConsultingItem, overhead: f64) -> f64 {
    item.headcount * item.monthly_amount * item.month_count * overhead
}

/// Computes and applies line-item totals under a configuration
pub struct TotalCalculator<'a> {
    config: &'a CalculationConfig,
}

impl<'a> TotalCalculator<'a> {
    pub fn new(config: &'a CalculationConfig) -> Self {
        Self { config }
    }

    /// Compute a row's total for the given unit, rounded per configuration
    pub fn compute(&self, item: &LineItem, unit: &str) -> Money {
        let raw = match &item.data {
            LineData::Mission(m) => self.config.formula_variant.evaluate(m),
            LineData::Consulting(c) => consulting_total(c, self.config.overhead_for(unit)),
        };
        Money::from_f64(raw.max(0.0), self.config.rounding)
    }

    /// Recompute one row's total unconditionally
    ///
    /// The row stops carrying its source total, so later passes keep
    /// recomputing it.
    pub fn recompute(&self, item: &mut LineItem, unit: &str) {
        item.total = self.compute(item, unit);
        item.total_source = TotalSource::Computed;
        item.source_total = None;
    }

    /// Bring a row's total in line with the current configuration
    ///
    /// A non-zero source total is kept, rounded to the configured precision,
    /// while `trust_existing_total` is set; any other row is recomputed.
    pub fn settle(&self, item: &mut LineItem, unit: &str) {
        let source = item
            .source_total
            .or((item.total_source == TotalSource::Loaded).then_some(item.total));
        let kept = source
            .filter(|_| self.config.trust_existing_total)
            .map(|total| total.round_to(self.config.rounding))
            .filter(|total| !total.is_zero());

        match kept {
            Some(total) => {
                item.source_total = source;
                item.total = total;
                item.total_source = TotalSource::Loaded;
            }
            None => {
                item.total = self.compute(item, unit);
                item.total_source = TotalSource::Computed;
            }
        }
    }

    /// Apply the load-time policy to a freshly built row
    pub fn apply_on_load(&self, item: &mut LineItem, unit: &str) {
        self.settle(item, unit);
    }

    /// Settle every row of a table
    pub fn settle_table(&self, table: &mut BudgetTable) {
        let unit = table.unit.clone();
        for item in &mut table.rows {
            self.settle(item, &unit);
        }
    }

    /// Recompute every row of a table
    pub fn recompute_table(&self, table: &mut BudgetTable) {
        let unit = table.unit.clone();
        for item in &mut table.rows {
            self.recompute(item, &unit);
        }
    }
}
