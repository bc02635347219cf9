//! Storage abstractions and in-memory implementations for tests/dev.

pub mod audit;
pub mod organizations;
pub mod tasks;

use thiserror::Error;

use tasktrack_core::DomainError;

pub use audit::{AuditRepository, InMemoryAuditRepository};
pub use organizations::{InMemoryOrganizationStore, OrganizationStore};
pub use tasks::{InMemoryTaskRepository, TaskRepository};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("duplicate id: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
