//! Per-operation access requirements, declared as data.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AuthzError, Permission, Role};

/// Identifier of a guarded operation (e.g. `"tasks.create"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(Cow<'static, str>);

impl OperationId {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OperationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const TASKS_CREATE: OperationId = OperationId::from_static("tasks.create");
pub const TASKS_LIST: OperationId = OperationId::from_static("tasks.list");
pub const TASKS_UPDATE: OperationId = OperationId::from_static("tasks.update");
pub const TASKS_REORDER: OperationId = OperationId::from_static("tasks.reorder");
pub const TASKS_DELETE: OperationId = OperationId::from_static("tasks.delete");
pub const AUDIT_LIST: OperationId = OperationId::from_static("audit.list");
pub const ORGANIZATIONS_LIST: OperationId = OperationId::from_static("organizations.list");
pub const ORGANIZATIONS_CREATE: OperationId = OperationId::from_static("organizations.create");

/// Role and permission requirements of one operation.
///
/// An empty list means "not specified" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// Satisfied if the caller is at least *one* of these roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Satisfied only if the caller holds *every* one of these permissions.
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Requirements {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::none().with_roles(roles)
    }

    pub fn permissions(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::none().with_permissions(permissions)
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}

/// Lookup table: operation → requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationTable {
    entries: HashMap<OperationId, Requirements>,
}

impl OperationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements of the task, audit and organization operations.
    pub fn standard() -> Self {
        Self::new()
            .with(TASKS_CREATE, Requirements::permissions([Permission::TaskCreate]))
            .with(TASKS_LIST, Requirements::permissions([Permission::TaskRead]))
            .with(TASKS_UPDATE, Requirements::permissions([Permission::TaskUpdate]))
            .with(TASKS_REORDER, Requirements::permissions([Permission::TaskUpdate]))
            .with(TASKS_DELETE, Requirements::permissions([Permission::TaskDelete]))
            .with(
                AUDIT_LIST,
                Requirements::roles([Role::Admin]).with_permissions([Permission::AuditRead]),
            )
            .with(ORGANIZATIONS_LIST, Requirements::none())
            .with(
                ORGANIZATIONS_CREATE,
                Requirements::roles([Role::Owner]).with_permissions([Permission::OrgManage]),
            )
    }

    pub fn with(mut self, operation: OperationId, requirements: Requirements) -> Self {
        self.entries.insert(operation, requirements);
        self
    }

    /// Requirements for `operation`.
    ///
    /// An operation missing from the table is a wiring defect, not an open door.
    pub fn requirements(&self, operation: &OperationId) -> Result<&Requirements, AuthzError> {
        self.entries.get(operation).ok_or_else(|| {
            AuthzError::configuration(format!("operation '{operation}' is not declared"))
        })
    }

    pub fn operations(&self) -> impl Iterator<Item = (&OperationId, &Requirements)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
