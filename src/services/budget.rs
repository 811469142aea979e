//! Budget pipeline service
//!
//! Runs the full pass over a table: normalize → total → aggregate →
//! reconcile. Every stage takes the table and configuration explicitly; the
//! service holds no state of its own beyond the configuration reference.

use serde::Serialize;

use crate::error::{BudgetError, BudgetResult};
use crate::import::{build_table, RawTable, SourceTables};
use crate::models::{
    BudgetCategory, BudgetTable, Field, LineItem, Money, RawCell, Warning,
};
use crate::services::aggregate::{
    component_totals, group_totals, objective_warnings, ComponentTotals, GroupKey, GroupedTotals,
};
use crate::services::calculator::{CalculationConfig, TotalCalculator};
use crate::services::normalize::assign_cell;
use crate::services::reconciliation::{reconcile, ReconciliationResult};

/// Outcome of loading several source tables
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tables: Vec<BudgetTable>,
    /// Tables that failed, by source name
    pub skipped: Vec<(String, BudgetError)>,
}

impl LoadReport {
    /// One warning per skipped table
    pub fn warnings(&self) -> Vec<Warning> {
        self.skipped
            .iter()
            .map(|(table, err)| Warning::TableSkipped {
                table: table.clone(),
                reason: err.to_string(),
            })
            .collect()
    }
}

/// A single applied cell edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEdit {
    pub row: usize,
    pub field: Field,
    pub before: String,
    pub after: String,
    pub total_before: Money,
    pub total_after: Money,
}

/// Everything a display or export collaborator needs after a pass
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub unit: String,
    pub category: BudgetCategory,
    pub row_count: usize,
    pub grand_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupedTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<ReconciliationResult>,
    pub warnings: Vec<Warning>,
}

/// Service for the budget computation pipeline
pub struct BudgetService<'a> {
    config: &'a CalculationConfig,
}

impl<'a> BudgetService<'a> {
    pub fn new(config: &'a CalculationConfig) -> Self {
        Self { config }
    }

    fn calculator(&self) -> TotalCalculator<'a> {
        TotalCalculator::new(self.config)
    }

    /// Type a raw table and compute its totals under the load-time policy
    pub fn load_table(
        &self,
        raw: &RawTable,
        unit: &str,
        category: BudgetCategory,
    ) -> BudgetResult<BudgetTable> {
        let mut table = build_table(raw, unit, category)?;
        let calculator = self.calculator();
        for item in &mut table.rows {
            calculator.apply_on_load(item, unit);
        }
        Ok(table)
    }

    /// Load several raw tables; a failing table never affects its siblings
    pub fn load_tables<F>(&self, raws: &[RawTable], category: BudgetCategory, unit_of: F) -> LoadReport
    where
        F: Fn(&RawTable) -> String,
    {
        let mut report = LoadReport::default();
        for raw in raws {
            match self.load_table(raw, &unit_of(raw), category) {
                Ok(table) => report.tables.push(table),
                Err(err) => report.skipped.push((raw.name.clone(), err)),
            }
        }
        report
    }

    /// Load every table read from a source, including sheets that could not
    /// be read, which are reported alongside tables that failed to bind
    pub fn load_source<F>(&self, source: SourceTables, category: BudgetCategory, unit_of: F) -> LoadReport
    where
        F: Fn(&RawTable) -> String,
    {
        let mut report = self.load_tables(&source.tables, category, unit_of);
        report.skipped.extend(source.failed);
        report
    }

    /// Edit one cell, recompute that row and settle the rest of the table
    pub fn set_field(
        &self,
        table: &mut BudgetTable,
        row: usize,
        field: Field,
        value: &RawCell,
    ) -> BudgetResult<FieldEdit> {
        let unit = table.unit.clone();
        let category = table.category;
        let calculator = self.calculator();
        calculator.settle_table(table);

        let item = table.row_mut(row)?;
        let before = item.display_value(field, self.config.rounding);
        let total_before = item.total;

        if !assign_cell(item, field, value) {
            return Err(BudgetError::FieldNotEditable {
                field: field.name().to_string(),
                category: category.to_string(),
            });
        }
        calculator.recompute(item, &unit);

        Ok(FieldEdit {
            row,
            field,
            before,
            after: item.display_value(field, self.config.rounding),
            total_before,
            total_after: item.total,
        })
    }

    /// Append a row built from field values; returns its index
    pub fn add_row(
        &self,
        table: &mut BudgetTable,
        values: &[(Field, RawCell)],
    ) -> BudgetResult<usize> {
        let mut item = LineItem::blank(table.category);
        for (field, value) in values {
            if !assign_cell(&mut item, *field, value) {
                return Err(BudgetError::FieldNotEditable {
                    field: field.name().to_string(),
                    category: table.category.to_string(),
                });
            }
        }
        let calculator = self.calculator();
        calculator.settle_table(table);
        calculator.recompute(&mut item, &table.unit);
        table.push(item)?;
        Ok(table.len() - 1)
    }

    /// Remove a row, returning it
    pub fn remove_row(&self, table: &mut BudgetTable, row: usize) -> BudgetResult<LineItem> {
        table.row(row)?;
        let removed = table.rows.remove(row);
        self.calculator().settle_table(table);
        Ok(removed)
    }

    /// Bring every total in line with the current configuration, keeping
    /// trusted source totals
    pub fn settle(&self, table: &mut BudgetTable) {
        self.calculator().settle_table(table);
    }

    /// Recompute every total after an external editor returned the table
    pub fn refresh(&self, table: &mut BudgetTable) {
        self.calculator().recompute_table(table);
    }

    /// Aggregate and reconcile a table
    ///
    /// `keys` may be empty, in which case no grouping is produced; objective
    /// warnings are reported either way.
    pub fn summarize(
        &self,
        table: &BudgetTable,
        keys: &[GroupKey],
        desired: Option<Money>,
    ) -> BudgetSummary {
        let grand_total = table.grand_total();

        let (groups, warnings) = if keys.is_empty() {
            (None, objective_warnings(table))
        } else {
            let grouped = group_totals(table, keys);
            let warnings = grouped.warnings.clone();
            (Some(grouped), warnings)
        };

        BudgetSummary {
            unit: table.unit.clone(),
            category: table.category,
            row_count: table.len(),
            grand_total,
            groups,
            components: component_totals(table),
            reconciliation: desired.map(|d| reconcile(d, grand_total)),
            warnings,
        }
    }
}
