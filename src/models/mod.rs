//! Core data models for budgetline
//!
//! Line items, budget tables, money, and the fields that bind source columns
//! to typed values.

pub mod category;
pub mod cell;
pub mod field;
pub mod line_item;
pub mod money;
pub mod table;
pub mod warning;

pub use category::{BudgetCategory, TableKey};
pub use cell::RawCell;
pub use field::Field;
pub use line_item::{ConsultingItem, LineData, LineItem, MissionItem, Objective, TotalSource};
pub use money::{Money, Rounding};
pub use table::{BudgetTable, Column};
pub use warning::Warning;
