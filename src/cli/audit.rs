//! Audit log command

use crate::error::BudgetResult;
use crate::storage::Storage;

pub fn handle_audit_command(storage: &Storage, limit: usize) -> BudgetResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
