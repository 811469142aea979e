//! Summary display formatting
//!
//! Group totals with bars, per-group row detail, mission cost components,
//! reconciliation status and warnings.

use crate::models::{BudgetTable, Field, Money, Rounding, Warning};
use crate::services::aggregate::{ComponentTotals, GroupedTotals};
use crate::services::budget::BudgetSummary;
use crate::services::reconciliation::ReconciliationResult;

use super::report::{double_separator, format_bar, format_money_colored, format_share, separator};

const BAR_WIDTH: usize = 20;
const WIDTH: usize = 72;

/// Format grouped totals, one line per group with a proportional bar
pub fn format_groups(grouped: &GroupedTotals, symbol: &str) -> String {
    let keys: Vec<String> = grouped.keys.iter().map(|k| k.to_string()).collect();
    let mut output = format!("Totals by {}\n", keys.join(" / "));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    if grouped.is_empty() {
        output.push_str("No groups.\n");
        return output;
    }

    let label_width = grouped
        .groups
        .iter()
        .map(|g| g.label().chars().count())
        .max()
        .unwrap_or(0)
        .max(5);
    let max_total = grouped
        .groups
        .iter()
        .map(|g| g.total.as_f64())
        .fold(0.0_f64, f64::max);
    let sum = grouped.total();

    for group in &grouped.groups {
        output.push_str(&format!(
            "{:<label_width$}  {:>16}  {:>6}  {}\n",
            group.label(),
            group.total.format_with_symbol(symbol),
            format_share(group.total, sum),
            format_bar(group.total.as_f64(), max_total, BAR_WIDTH),
            label_width = label_width
        ));
    }

    output.push_str(&format!(
        "{:<label_width$}  {:>16}\n",
        "Total",
        sum.format_with_symbol(symbol),
        label_width = label_width
    ));
    if !grouped.excluded_rows.is_empty() {
        output.push_str(&format!(
            "({} row(s) excluded from grouping)\n",
            grouped.excluded_rows.len()
        ));
    }

    output
}

/// Format each group followed by the rows that belong to it
pub fn format_group_detail(
    table: &BudgetTable,
    grouped: &GroupedTotals,
    rounding: Rounding,
    symbol: &str,
) -> String {
    let detail_fields: Vec<Field> = Field::fields_for(table.category)
        .iter()
        .copied()
        .filter(|f| *f != Field::Total && table.header_for(*f).is_some())
        .filter(|f| !grouped.keys.iter().any(|k| k.field() == *f))
        .take(6)
        .collect();

    let mut output = String::new();
    for group in &grouped.groups {
        output.push_str(&format!(
            "{} ({} rows): {}\n",
            group.label(),
            group.rows.len(),
            group.total.format_with_symbol(symbol)
        ));
        for &index in &group.rows {
            let Some(row) = table.rows.get(index) else {
                continue;
            };
            let values: Vec<String> = detail_fields
                .iter()
                .map(|f| format!("{}={}", f.name(), row.display_value(*f, rounding)))
                .collect();
            output.push_str(&format!(
                "  #{:<4} {:>14}  {}\n",
                index,
                row.total.format_plain(rounding),
                values.join(" ")
            ));
        }
    }
    output
}

/// Format the four mission cost component sums
pub fn format_components(components: &ComponentTotals, symbol: &str) -> String {
    let entries = components.entries();
    let sum: Money = entries.iter().map(|(_, m)| *m).sum();
    let max = entries.iter().map(|(_, m)| m.as_f64()).fold(0.0_f64, f64::max);

    let mut output = format!("Totals by cost component\n{}\n", separator(WIDTH));
    for (field, amount) in entries {
        output.push_str(&format!(
            "{:<18}  {:>16}  {:>6}  {}\n",
            field.label(),
            amount.format_with_symbol(symbol),
            format_share(amount, sum),
            format_bar(amount.as_f64(), max, BAR_WIDTH)
        ));
    }
    output
}

/// Format a reconciliation result
pub fn format_reconciliation(result: &ReconciliationResult, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Desired amount:  {:>16}\n",
        result.desired_amount.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Actual sum:      {:>16}\n",
        result.actual_sum.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "Difference:      {:>16}\n",
        format_money_colored(result.difference, symbol)
    ));
    output.push_str(&format!("Status:          {}\n", result.status()));
    output
}

pub fn format_warnings(warnings: &[Warning]) -> String {
    warnings
        .iter()
        .map(|w| format!("warning: {}\n", w))
        .collect()
}

/// Format a full summary
pub fn format_summary(summary: &BudgetSummary, symbol: &str) -> String {
    let mut output = format!(
        "{} / {}  ({} rows)\n{}\n",
        summary.unit,
        summary.category,
        summary.row_count,
        double_separator(WIDTH)
    );
    output.push_str(&format!(
        "Grand total:     {:>16}\n\n",
        summary.grand_total.format_with_symbol(symbol)
    ));

    if let Some(groups) = &summary.groups {
        output.push_str(&format_groups(groups, symbol));
        output.push('\n');
    }
    if let Some(components) = &summary.components {
        output.push_str(&format_components(components, symbol));
        output.push('\n');
    }
    if let Some(reconciliation) = &summary.reconciliation {
        output.push_str(&format_reconciliation(reconciliation, symbol));
    }
    output.push_str(&format_warnings(&summary.warnings));
    output
}
