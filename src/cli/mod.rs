//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod args;
pub mod audit;
pub mod config;
pub mod export;
pub mod import;
pub mod summary;
pub mod table;
pub mod target;

pub use args::TableArgs;
pub use audit::handle_audit_command;
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use import::{handle_import_command, ImportArgs};
pub use summary::{handle_reconcile_command, handle_summary_command, ReconcileArgs, SummaryArgs};
pub use table::{
    handle_edit_command, handle_recompute_command, handle_remove_command, handle_show_command,
    handle_tables_command, EditCommands,
};
pub use target::{handle_target_command, TargetCommands};
