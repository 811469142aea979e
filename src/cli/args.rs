//! Arguments shared by several commands

use clap::Args;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetCategory, Field, Money};

/// Selects one stored table
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Organizational unit (e.g. VPO)
    pub unit: String,

    /// Table category: misiones or consultorias
    #[arg(short, long)]
    pub category: BudgetCategory,
}

/// Parse a user-entered amount such as `1,500` or `$1500.50`
pub fn parse_amount(input: &str) -> BudgetResult<Money> {
    Money::parse(input).map_err(|e| BudgetError::Validation(format!("Invalid amount: {}", e)))
}

/// Parse a `field=value` pair
pub fn parse_assignment(input: &str) -> BudgetResult<(Field, String)> {
    let (field, value) = input.split_once('=').ok_or_else(|| {
        BudgetError::Validation(format!("Expected field=value, got '{}'", input))
    })?;
    let field = field.parse::<Field>().map_err(BudgetError::Validation)?;
    Ok((field, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let (field, value) = parse_assignment("Días= 4").unwrap();
        assert_eq!(field, Field::Days);
        assert_eq!(value, "4");
        assert!(parse_assignment("days").is_err());
        assert!(parse_assignment("colour=red").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,500").unwrap(), Money::from_units(1500));
        assert!(parse_amount("lots").is_err());
    }
}
