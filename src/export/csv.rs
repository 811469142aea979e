//! CSV export of tables and grouped totals

use std::io::Write;

use csv::Writer;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetTable, Field, Rounding};
use crate::services::aggregate::GroupedTotals;

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

/// Write a table with its current totals
///
/// Columns keep their source order and headers. A `Total` column is appended
/// when the source had none. Totals are formatted per `rounding`.
pub fn export_table_csv<W: Write>(
    table: &BudgetTable,
    rounding: Rounding,
    writer: W,
) -> BudgetResult<()> {
    let mut csv = Writer::from_writer(writer);

    let mut header: Vec<&str> = table.columns.iter().map(|c| c.header.as_str()).collect();
    let append_total = !table.has_total_column();
    if append_total {
        header.push(Field::Total.label());
    }
    csv.write_record(&header).map_err(export_err)?;

    for row in &table.rows {
        let mut record: Vec<String> = table
            .columns
            .iter()
            .map(|column| match column.field {
                Some(field) => row.display_value(field, rounding),
                None => row.extra.get(&column.header).cloned().unwrap_or_default(),
            })
            .collect();
        if append_total {
            record.push(row.total.format_plain(rounding));
        }
        csv.write_record(&record).map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

/// Write one line per group: key values, row count and total
pub fn export_groups_csv<W: Write>(
    grouped: &GroupedTotals,
    rounding: Rounding,
    writer: W,
) -> BudgetResult<()> {
    let mut csv = Writer::from_writer(writer);

    let mut header: Vec<String> = grouped.keys.iter().map(|k| k.field().label().to_string()).collect();
    header.push("Filas".to_string());
    header.push(Field::Total.label().to_string());
    csv.write_record(&header).map_err(export_err)?;

    for group in &grouped.groups {
        let mut record = group.values.clone();
        record.push(group.rows.len().to_string());
        record.push(group.total.format_plain(rounding));
        csv.write_record(&record).map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{build_table, RawTable};
    use crate::models::{BudgetCategory, RawCell};
    use crate::services::aggregate::{group_totals, GroupKey};
    use crate::services::calculator::{CalculationConfig, TotalCalculator};

    fn consulting_table() -> BudgetTable {
        let mut raw = RawTable::new(
            "VPO",
            ["Cargo", "Notas", "Nº", "Monto Mensual", "Cantidad de Meses", "Área"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
        );
        raw.rows.push(vec![
            RawCell::from("Analista, Senior"),
            RawCell::from("prioridad"),
            RawCell::from("2"),
            RawCell::from("1,000.5"),
            RawCell::from("6"),
            RawCell::from("Salud"),
        ]);
        let mut table = build_table(&raw, "VPO", BudgetCategory::Consulting).unwrap();
        let config = CalculationConfig::default();
        TotalCalculator::new(&config).recompute_table(&mut table);
        table
    }

    #[test]
    fn test_table_csv_keeps_column_order_and_appends_total() {
        let table = consulting_table();
        let mut out = Vec::new();
        export_table_csv(&table, Rounding::TwoDecimal, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Cargo,Notas,Nº,Monto Mensual,Cantidad de Meses,Área,Total"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Analista, Senior\",prioridad,2,1000.5,6,Salud,12006.00"
        );
    }

    #[test]
    fn test_groups_csv() {
        let table = consulting_table();
        let grouped = group_totals(&table, &[GroupKey::Area]);
        let mut out = Vec::new();
        export_groups_csv(&grouped, Rounding::Integer, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Área,Filas,Total\nSalud,1,12006\n");
    }
}
