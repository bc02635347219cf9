//! `tasktrack-tenancy` — organization-tree visibility and record scoping.
//!
//! Decides *which records* a principal may see. Whether an action is allowed
//! at all is `tasktrack-auth`'s job.

pub mod directory;
pub mod error;
pub mod organization;
pub mod pagination;
pub mod predicate;
pub mod resolver;
pub mod scoping;

pub use directory::{DirectoryError, OrganizationDirectory};
pub use error::ScopeError;
pub use organization::Organization;
pub use pagination::{Page, PageRequest};
pub use predicate::{Columns, Field, Predicate, ScopedResource, SqlFilter, SqlParam};
pub use resolver::{AccessibleOrganizations, OrganizationTreeResolver, accessible_from};
pub use scoping::{ResourceKind, ScopingFilter, scope_predicate};
