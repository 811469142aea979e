//! Service layer for budgetline
//!
//! The pure pipeline stages (normalize, calculator, aggregate,
//! reconciliation) take their inputs explicitly. [`BudgetService`] chains
//! them; [`TableService`] adds persistence and audit logging on top.

pub mod aggregate;
pub mod budget;
pub mod calculator;
pub mod normalize;
pub mod reconciliation;
pub mod table;

pub use aggregate::GroupKey;
pub use budget::{BudgetService, BudgetSummary, FieldEdit, LoadReport};
pub use calculator::{CalculationConfig, MissionFormula, TotalCalculator};
pub use reconciliation::{ReconciliationResult, ReconciliationStatus};
pub use table::TableService;
