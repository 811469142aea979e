//! Audit logging for budgetline
//!
//! Every mutation of stored state (table imports, cell edits, recomputes,
//! settings changes) and every export is appended to a line-delimited JSON
//! log. Entries carry before/after snapshots and a short diff summary.
//!
//! ```rust,ignore
//! use budgetline::audit::{AuditEntry, AuditLogger, EntityType, generate_diff};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let diff = generate_diff(&before, &after);
//! logger.log(&AuditEntry::update(EntityType::LineItem, "VPO/Misiones#3", None, &before, &after, diff))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
