//! Non-fatal problems surfaced alongside results

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recoverable row- or table-level problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Objective outside {"R","E"}; the row is kept but left out of objective groups
    InvalidObjective {
        table: String,
        row: usize,
        value: String,
    },
    /// Rows without an objective, left out of objective groups
    MissingObjective { table: String, rows: usize },
    /// A table that could not be processed; siblings were unaffected
    TableSkipped { table: String, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidObjective { table, row, value } => write!(
                f,
                "{}: row {} has invalid objective '{}' (expected R or E); excluded from objective totals",
                table, row, value
            ),
            Warning::MissingObjective { table, rows } => write!(
                f,
                "{}: {} row(s) have no objective; excluded from objective totals",
                table, rows
            ),
            Warning::TableSkipped { table, reason } => {
                write!(f, "{}: table skipped ({})", table, reason)
            }
        }
    }
}
