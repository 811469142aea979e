//! budgetline - budget line-item total calculation and reconciliation
//!
//! Loads Misiones (missions) and Consultorías (consulting) tables from
//! spreadsheets or CSV, derives each row's total from its inputs, aggregates
//! totals by categorical keys and reconciles the grand sum against a desired
//! amount.
//!
//! # Architecture
//!
//! - `import`: raw tabular sources (calamine workbooks, CSV) and column binding
//! - `models`: typed tables, line items, money and warnings
//! - `services`: the pipeline (normalize → calculator → aggregate →
//!   reconciliation) and the stored-table service
//! - `storage`, `config`, `audit`: persistence, settings and the change log
//! - `display`, `export`, `cli`: output surfaces
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetline::import::read_source;
//! use budgetline::models::BudgetCategory;
//! use budgetline::services::{BudgetService, CalculationConfig, GroupKey};
//!
//! let config = CalculationConfig::default();
//! let service = BudgetService::new(&config);
//! let raw = read_source(Path::new("BDD_Ajuste.xlsx"), Some("Original_VPO"))?;
//! let table = service.load_table(&raw, "VPO", BudgetCategory::Missions)?;
//! let summary = service.summarize(&table, &[GroupKey::Country], None);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
