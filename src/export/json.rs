//! JSON export of a computed summary

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Rounding, TableKey};
use crate::services::budget::BudgetSummary;
use crate::services::calculator::{CalculationConfig, MissionFormula};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A summary with the settings that produced it
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport<'a> {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub table: TableKey,
    pub settings: ExportSettings,
    pub summary: &'a BudgetSummary,
}

/// Calculation options recorded alongside an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub formula_variant: MissionFormula,
    pub overhead_multiplier: f64,
    pub rounding: Rounding,
    pub trust_existing_total: bool,
}

impl<'a> SummaryExport<'a> {
    pub fn new(summary: &'a BudgetSummary, config: &CalculationConfig) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            table: TableKey::new(summary.unit.clone(), summary.category),
            settings: ExportSettings {
                formula_variant: config.formula_variant,
                overhead_multiplier: config.overhead_for(&summary.unit),
                rounding: config.rounding,
                trust_existing_total: config.trust_existing_total,
            },
            summary,
        }
    }
}

/// Write a summary as pretty-printed JSON
pub fn export_summary_json<W: Write>(
    summary: &BudgetSummary,
    config: &CalculationConfig,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = SummaryExport::new(summary, config);
    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}
