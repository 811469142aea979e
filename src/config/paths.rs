//! Path management for budgetline
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGETLINE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/budgetline` or `~/.config/budgetline`
//! 3. Windows: `%APPDATA%\budgetline`

use std::path::PathBuf;

use crate::error::{BudgetError, BudgetResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGETLINE_DATA_DIR";

/// Manages all paths used by budgetline
#[derive(Debug, Clone)]
pub struct BudgetPaths {
    base_dir: PathBuf,
}

impl BudgetPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> BudgetResult<Self> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per stored table
    pub fn tables_dir(&self) -> PathBuf {
        self.base_dir.join("tables")
    }

    /// Default destination for exports
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base, tables and exports directories exist
    pub fn ensure_directories(&self) -> BudgetResult<()> {
        for dir in [self.base_dir.clone(), self.tables_dir(), self.exports_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                BudgetError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Check if settings have ever been saved
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> BudgetResult<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BudgetError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("budgetline"))
}

#[cfg(windows)]
fn resolve_default_path() -> BudgetResult<PathBuf> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BudgetError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("budgetline"))
}
