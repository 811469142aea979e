//! YAML export of a computed summary

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::SummaryExport;
use crate::services::budget::BudgetSummary;
use crate::services::calculator::CalculationConfig;

/// Write a summary as YAML with a short comment header
pub fn export_summary_yaml<W: Write>(
    summary: &BudgetSummary,
    config: &CalculationConfig,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = SummaryExport::new(summary, config);
    let err = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# budgetline summary: {}", export.table).map_err(err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(err)?;
    writeln!(writer).map_err(err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetCategory, BudgetTable};
    use crate::services::budget::BudgetService;

    #[test]
    fn test_yaml_round_trips_as_value() {
        let config = CalculationConfig::default();
        let table = BudgetTable::new("VPE", BudgetCategory::Missions);
        let summary = BudgetService::new(&config).summarize(&table, &[], None);

        let mut out = Vec::new();
        export_summary_yaml(&summary, &config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# budgetline summary: VPE/Misiones"));
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["summary"]["unit"].as_str(), Some("VPE"));
        assert_eq!(value["settings"]["formula_variant"].as_str(), Some("additive"));
    }
}
