//! `tasktrack-core` — shared domain primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AuditEntryId, OrganizationId, TaskId, UserId};
