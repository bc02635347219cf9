//! Task and audit-trail records.
//!
//! Plain data plus the filters that run *after* visibility scoping. No IO.

pub mod audit;
pub mod query;
pub mod sanitize;
pub mod task;

pub use audit::{AuditAction, AuditAuthor, AuditEntry, NewAuditEntry};
pub use query::TaskQuery;
pub use sanitize::{escape_like, sanitize_text};
pub use task::{NewTask, Task, TaskCategory, TaskFilters, TaskPatch, TaskStatus};
