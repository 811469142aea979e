//! Table display formatting
//!
//! Renders budget tables as aligned text grids.

use crate::models::{BudgetTable, Field, Rounding};

use super::report::truncate;

const MAX_CELL_WIDTH: usize = 24;

/// Format a table's rows, source columns first and the total last
pub fn format_table(table: &BudgetTable, rounding: Rounding) -> String {
    let mut headers: Vec<String> = vec!["#".to_string()];
    headers.extend(table.columns.iter().map(|c| c.header.clone()));
    let append_total = !table.has_total_column();
    if append_total {
        headers.push(Field::Total.label().to_string());
    }

    let mut numeric = vec![true];
    numeric.extend(
        table
            .columns
            .iter()
            .map(|c| c.field.map(|f| f.is_numeric()).unwrap_or(false)),
    );
    if append_total {
        numeric.push(true);
    }

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut cells = vec![index.to_string()];
            cells.extend(table.columns.iter().map(|column| {
                let text = match column.field {
                    Some(field) => row.display_value(field, rounding),
                    None => row.extra.get(&column.header).cloned().unwrap_or_default(),
                };
                truncate(&text, MAX_CELL_WIDTH)
            }));
            if append_total {
                cells.push(row.total.format_plain(rounding));
            }
            cells
        })
        .collect();

    let mut output = format!("{} ({} rows)\n", table.name, table.len());
    if rows.is_empty() {
        output.push_str("No rows.\n");
        return output;
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(truncate(h, MAX_CELL_WIDTH).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .zip(&numeric)
            .map(|((cell, &width), &is_num)| {
                if is_num {
                    format!("{:>width$}", cell, width = width)
                } else {
                    format!("{:<width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| truncate(h, MAX_CELL_WIDTH)).collect();
    output.push_str(&render(&header_cells));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    output.push('\n');
    for row in &rows {
        output.push_str(&render(row));
        output.push('\n');
    }

    output
}

/// Format stored tables as a list with their grand totals
pub fn format_table_list(tables: &[BudgetTable], symbol: &str) -> String {
    if tables.is_empty() {
        return "No tables stored. Import one with `budgetline import`.".to_string();
    }

    let unit_width = tables
        .iter()
        .map(|t| t.unit.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = format!(
        "{:<unit_width$}  {:<12}  {:>6}  {:>16}\n",
        "Unit",
        "Category",
        "Rows",
        "Total",
        unit_width = unit_width
    );
    output.push_str(&format!(
        "{:-<unit_width$}  {:-<12}  {:->6}  {:->16}\n",
        "",
        "",
        "",
        "",
        unit_width = unit_width
    ));

    for table in tables {
        output.push_str(&format!(
            "{:<unit_width$}  {:<12}  {:>6}  {:>16}\n",
            table.unit,
            table.category.to_string(),
            table.len(),
            table.grand_total().format_with_symbol(symbol),
            unit_width = unit_width
        ));
    }

    output
}
