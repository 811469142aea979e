//! Export module for budgetline
//!
//! - CSV: a table's rows with recomputed totals, in source column order,
//!   and grouped totals
//! - JSON / YAML: a computed summary (grand total, groups, components,
//!   reconciliation, warnings)

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_groups_csv, export_table_csv};
pub use json::{export_summary_json, SummaryExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_summary_yaml;
