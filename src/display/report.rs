//! Shared text-report helpers

use crate::models::Money;

/// Color a signed amount: red below zero, green above
pub fn format_money_colored(amount: Money, symbol: &str) -> String {
    let text = amount.format_with_symbol(symbol);
    if amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", text)
    } else if amount.is_positive() {
        format!("\x1b[32m{}\x1b[0m", text)
    } else {
        text
    }
}

/// Share of `part` in `whole` as a percentage string
pub fn format_share(part: Money, whole: Money) -> String {
    if whole.is_zero() {
        return "-".to_string();
    }
    let pct = part.cents() as f64 / whole.cents() as f64 * 100.0;
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar proportional to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate to `max_len` characters, ending in `...` when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(Money::from_units(1), Money::from_units(2000)), "0.05%");
        assert_eq!(format_share(Money::from_units(55), Money::from_units(1000)), "5.5%");
        assert_eq!(format_share(Money::from_units(1), Money::from_units(2)), "50%");
        assert_eq!(format_share(Money::from_units(1), Money::zero()), "-");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 10.0, 3), "   ");
        assert_eq!(format_bar(20.0, 10.0, 2), "██");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Perú", 4), "Perú");
        assert_eq!(truncate("Consultorías", 8), "Consu...");
        assert_eq!(truncate("abcdef", 2), "..");
    }

    #[test]
    fn test_colored_money() {
        assert_eq!(format_money_colored(Money::zero(), "$"), "$0.00");
        assert!(format_money_colored(Money::from_units(-5), "$").starts_with("\x1b[31m"));
    }
}
