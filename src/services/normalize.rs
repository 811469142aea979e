//! Cell normalization
//!
//! Turns raw cells into clean values. Normalization never fails: anything
//! that does not parse becomes zero (numbers) or `None` (text), and negative
//! numbers clamp to zero.

use crate::models::{Field, LineItem, RawCell};

/// Normalize a cell into a non-negative number
///
/// # Examples
/// ```
/// use budgetline::models::RawCell;
/// use budgetline::services::normalize::normalize_number;
/// assert_eq!(normalize_number(&RawCell::from("  1,234.50 ")), 1234.5);
/// assert_eq!(normalize_number(&RawCell::from("n/a")), 0.0);
/// assert_eq!(normalize_number(&RawCell::Empty), 0.0);
/// ```
pub fn normalize_number(cell: &RawCell) -> f64 {
    let value = match cell {
        RawCell::Empty => 0.0,
        RawCell::Number(v) => *v,
        RawCell::Bool(b) => f64::from(u8::from(*b)),
        RawCell::Text(s) => parse_number(s).unwrap_or(0.0),
    };
    clamp(value)
}

/// Normalize a string into a non-negative number
pub fn normalize_str(s: &str) -> f64 {
    clamp(parse_number(s).unwrap_or(0.0))
}

/// Normalize a cell into trimmed text, `None` when blank
pub fn normalize_text(cell: &RawCell) -> Option<String> {
    let text = match cell {
        RawCell::Empty => return None,
        RawCell::Number(v) => crate::models::line_item::format_number(*v),
        RawCell::Bool(b) => b.to_string(),
        RawCell::Text(s) => s.trim_matches(is_space).to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Normalize a cell into one of a row's input fields
///
/// Returns false when the field is derived (`total`) or not part of the
/// row's shape; the row is left unchanged in that case.
pub fn assign_cell(item: &mut LineItem, field: Field, cell: &RawCell) -> bool {
    if field == Field::Total {
        return false;
    }
    if field.is_numeric() {
        match item.number_mut(field) {
            Some(slot) => {
                *slot = normalize_number(cell);
                true
            }
            None => false,
        }
    } else {
        item.set_text(field, normalize_text(cell))
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_matches(is_space);
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let s = s.strip_prefix('$').unwrap_or(s);
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | '\'') && !is_space(*c))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{a0}'
}

fn clamp(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
