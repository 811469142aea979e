//! Display formatting for terminal output

pub mod report;
pub mod summary;
pub mod table;

pub use summary::{
    format_components, format_group_detail, format_groups, format_reconciliation, format_summary,
    format_warnings,
};
pub use table::{format_table, format_table_list};
