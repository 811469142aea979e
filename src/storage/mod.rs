//! Storage layer for budgetline
//!
//! JSON file storage with atomic writes, plus the audit log that records
//! every change made through it.

pub mod file_io;
pub mod tables;

pub use file_io::{read_json, write_json_atomic};
pub use tables::{FileTableStore, MemoryTableStore, TableStore};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::BudgetPaths;
use crate::error::BudgetResult;

/// Storage coordinator: table store plus audit log
pub struct Storage {
    paths: BudgetPaths,
    pub tables: Box<dyn TableStore>,
    audit: AuditLogger,
}

impl Storage {
    /// Open file-backed storage, creating directories as needed
    pub fn new(paths: BudgetPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            tables: Box::new(FileTableStore::new(paths.tables_dir())),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Storage with tables held in memory; the audit log still goes to `paths`
    pub fn in_memory(paths: BudgetPaths) -> Self {
        Self {
            tables: Box::new(MemoryTableStore::new()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        }
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append an entry to the audit log
    pub fn log(&self, entry: &AuditEntry) -> BudgetResult<()> {
        self.audit.log(entry)
    }
}
