//! `tasktrack-auth` — pure authorization boundary.
//!
//! Role hierarchy, permission registry, and the enforcement guard. No HTTP,
//! no storage.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod explain;
pub mod hierarchy;
pub mod operations;
pub mod permissions;
pub mod policy;
pub mod principal;
pub mod registry;
pub mod roles;

pub use authorize::{Decision, DenyReason, Guard, decide};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use error::AuthzError;
pub use explain::{AuthorizationExplanation, explain_authorization};
pub use hierarchy::RoleHierarchy;
pub use operations::{OperationId, OperationTable, Requirements};
pub use permissions::Permission;
pub use policy::{AccessPolicy, PolicyDocument, PolicySummary};
pub use principal::Principal;
pub use registry::RolePermissionSet;
pub use roles::Role;
