//! Configuration module for budgetline
//!
//! Path resolution for the data directory and persisted user settings
//! (calculation policy and desired amounts).

pub mod paths;
pub mod settings;

pub use paths::BudgetPaths;
pub use settings::{Settings, TargetAmount};
