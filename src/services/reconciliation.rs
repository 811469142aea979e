//! Budget reconciliation
//!
//! Compares a computed sum against a desired (target) amount. Positive
//! differences mean the line items fall short of the target; negative
//! differences mean they exceed it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Money;

/// Where a table stands relative to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    Balanced,
    /// Line items sum to less than the target
    UnderBudget,
    /// Line items sum to more than the target
    OverBudget,
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationStatus::Balanced => write!(f, "Balanced"),
            ReconciliationStatus::UnderBudget => write!(f, "Under budget"),
            ReconciliationStatus::OverBudget => write!(f, "Over budget"),
        }
    }
}

/// Result of reconciling an actual sum against a desired amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub actual_sum: Money,
    pub desired_amount: Money,
    /// `desired_amount - actual_sum`
    pub difference: Money,
}

impl ReconciliationResult {
    pub fn status(&self) -> ReconciliationStatus {
        if self.difference.is_zero() {
            ReconciliationStatus::Balanced
        } else if self.difference.is_positive() {
            ReconciliationStatus::UnderBudget
        } else {
            ReconciliationStatus::OverBudget
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }
}

/// Reconcile an actual sum against a desired amount
pub fn reconcile(desired_amount: Money, actual_sum: Money) -> ReconciliationResult {
    ReconciliationResult {
        actual_sum,
        desired_amount,
        difference: desired_amount - actual_sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_restores_desired() {
        let pairs = [
            (0, 0),
            (100_000, 64_000),
            (64_000, 100_000),
            (-5, 7),
            (123_456_789, 1),
        ];
        for (desired, actual) in pairs {
            let desired = Money::from_cents(desired);
            let actual = Money::from_cents(actual);
            let result = reconcile(desired, actual);
            assert_eq!(result.difference + actual, desired);
        }
    }

    #[test]
    fn test_status() {
        let under = reconcile(Money::from_units(1000), Money::from_units(640));
        assert_eq!(under.difference, Money::from_units(360));
        assert_eq!(under.status(), ReconciliationStatus::UnderBudget);

        let over = reconcile(Money::from_units(600), Money::from_units(640));
        assert_eq!(over.difference, Money::from_units(-40));
        assert_eq!(over.status(), ReconciliationStatus::OverBudget);

        let balanced = reconcile(Money::zero(), Money::zero());
        assert!(balanced.is_balanced());
        assert_eq!(balanced.status(), ReconciliationStatus::Balanced);
    }
}
