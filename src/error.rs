//! Custom error types for budgetline
//!
//! Table-level failures (missing columns, unreadable sheets) are errors;
//! row-level problems are recovered locally and surfaced as
//! [`Warning`](crate::models::Warning) values instead.

use thiserror::Error;

/// The main error type for budgetline operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user-supplied values
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required column is absent from a source table
    #[error("Table '{table}' is missing required field '{field}'")]
    MissingField { table: String, field: String },

    /// The requested worksheet does not exist in the workbook
    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFound { sheet: String, path: String },

    /// No table stored under the given unit/category
    #[error("No {category} table stored for unit '{unit}'")]
    TableNotFound { unit: String, category: String },

    /// Row index outside the table
    #[error("Row {row} out of range (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    /// Field does not exist on this table's shape, or cannot be edited
    #[error("Field '{field}' cannot be edited on a {category} table")]
    FieldNotEditable { field: String, category: String },

    /// Import errors (spreadsheet or CSV)
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create a "missing field" error for a table
    pub fn missing_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Create a "table not found" error
    pub fn table_not_found(unit: impl Into<String>, category: impl ToString) -> Self {
        Self::TableNotFound {
            unit: unit.into(),
            category: category.to_string(),
        }
    }

    /// Check if this is a missing-column error
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TableNotFound { .. } | Self::SheetNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

impl From<calamine::Error> for BudgetError {
    fn from(err: calamine::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for budgetline operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_missing_field_error() {
        let err = BudgetError::missing_field("Original_VPO", "days");
        assert_eq!(
            err.to_string(),
            "Table 'Original_VPO' is missing required field 'days'"
        );
        assert!(err.is_missing_field());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_table_not_found_error() {
        let err = BudgetError::table_not_found("VPO", "Misiones");
        assert_eq!(err.to_string(), "No Misiones table stored for unit 'VPO'");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let budget_err: BudgetError = io_err.into();
        assert!(matches!(budget_err, BudgetError::Io(_)));
    }
}
