//! Access policy: the single configuration value holding the role hierarchy
//! and the permission registry.
//!
//! Built once at startup, then shared read-only (`Arc<AccessPolicy>`) with
//! every component that needs it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{AuthzError, OperationTable, Permission, Role, RoleHierarchy, RolePermissionSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    hierarchy: RoleHierarchy,
    permissions: RolePermissionSet,
}

impl AccessPolicy {
    pub fn standard() -> Self {
        let hierarchy = RoleHierarchy::standard();
        let permissions = RolePermissionSet::standard(&hierarchy);
        Self {
            hierarchy,
            permissions,
        }
    }

    /// Assemble a policy from parts, checking the inheritance contract.
    pub fn new(
        hierarchy: RoleHierarchy,
        permissions: RolePermissionSet,
    ) -> Result<Self, AuthzError> {
        permissions.verify(&hierarchy)?;
        Ok(Self {
            hierarchy,
            permissions,
        })
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    pub fn registry(&self) -> &RolePermissionSet {
        &self.permissions
    }

    pub fn level(&self, role: Role) -> u32 {
        self.hierarchy.level(role)
    }

    pub fn is_at_least(&self, candidate: Role, required: Role) -> bool {
        self.hierarchy.is_at_least(candidate, required)
    }

    pub fn permissions_of(&self, role: Role) -> &BTreeSet<Permission> {
        self.permissions.permissions_of(role)
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.permissions.has_permission(role, permission)
    }

    /// Operator-facing view of the policy (roles, levels, permissions).
    pub fn summary(&self) -> PolicySummary {
        let roles = self
            .hierarchy
            .ascending()
            .into_iter()
            .map(|role| RoleDefinition {
                name: role,
                level: self.level(role),
                permissions: self.permissions_of(role).iter().copied().collect(),
                description: role.description(),
            })
            .collect();

        let permissions = Permission::ALL
            .into_iter()
            .map(|p| PermissionDefinition {
                name: p,
                description: p.description(),
                category: p.category(),
            })
            .collect();

        PolicySummary { roles, permissions }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub level: u32,
    pub permissions: Vec<Permission>,
    pub description: &'static str,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub name: Permission,
    pub description: String,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicySummary {
    pub roles: Vec<RoleDefinition>,
    pub permissions: Vec<PermissionDefinition>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Policy document (JSON configuration)
// ─────────────────────────────────────────────────────────────────────────────

/// Per-role entry of a policy document. `grants` lists only the permissions
/// the role adds on top of the roles below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub level: u32,
    #[serde(default)]
    pub grants: BTreeSet<Permission>,
}

/// Serialized form of an access policy plus its operation table.
///
/// ```json
/// {
///   "roles": {
///     "viewer": { "level": 1, "grants": ["task:read"] },
///     "admin":  { "level": 2, "grants": ["task:create", "audit:read"] },
///     "owner":  { "level": 3, "grants": ["org:manage"] }
///   },
///   "operations": { "tasks.create": { "permissions": ["task:create"] } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub roles: BTreeMap<Role, RoleEntry>,
    /// Omitted → the standard operation table.
    #[serde(default)]
    pub operations: Option<OperationTable>,
}

impl PolicyDocument {
    pub fn from_json(raw: &str) -> Result<Self, AuthzError> {
        serde_json::from_str(raw)
            .map_err(|e| AuthzError::configuration(format!("invalid policy document: {e}")))
    }

    /// Validate and build the runtime policy and operation table.
    pub fn build(self) -> Result<(AccessPolicy, OperationTable), AuthzError> {
        let levels: BTreeMap<Role, u32> = self
            .roles
            .iter()
            .map(|(role, entry)| (*role, entry.level))
            .collect();
        let hierarchy = RoleHierarchy::from_levels(&levels)?;

        let grants: BTreeMap<Role, BTreeSet<Permission>> = self
            .roles
            .into_iter()
            .map(|(role, entry)| (role, entry.grants))
            .collect();
        let permissions = RolePermissionSet::inherited(&hierarchy, &grants);

        let policy = AccessPolicy::new(hierarchy, permissions)?;
        let operations = self.operations.unwrap_or_else(OperationTable::standard);
        Ok((policy, operations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::TASKS_CREATE;

    const DOC: &str = r#"{
        "roles": {
            "viewer": { "level": 1, "grants": ["task:read"] },
            "admin":  { "level": 2, "grants": ["task:create", "task:update", "task:delete", "audit:read"] },
            "owner":  { "level": 3, "grants": ["user:manage", "org:manage"] }
        }
    }"#;

    #[test]
    fn document_matching_defaults_builds_standard_policy() {
        let (policy, ops) = PolicyDocument::from_json(DOC).unwrap().build().unwrap();
        assert_eq!(policy, AccessPolicy::standard());
        assert_eq!(ops, OperationTable::standard());
    }

    #[test]
    fn unknown_role_in_document_is_rejected() {
        let raw = r#"{ "roles": { "superuser": { "level": 9 } } }"#;
        assert!(matches!(
            PolicyDocument::from_json(raw),
            Err(AuthzError::Configuration(_))
        ));
    }

    #[test]
    fn unknown_permission_in_document_is_rejected() {
        let raw = r#"{ "roles": { "viewer": { "level": 1, "grants": ["task:archive"] } } }"#;
        assert!(PolicyDocument::from_json(raw).is_err());
    }

    #[test]
    fn document_with_reordered_roles_is_rejected() {
        let raw = r#"{
            "roles": {
                "viewer": { "level": 1, "grants": ["task:read"] },
                "admin":  { "level": 30, "grants": ["task:create", "task:update", "task:delete", "audit:read"] },
                "owner":  { "level": 20, "grants": ["user:manage", "org:manage"] }
            }
        }"#;
        let err = PolicyDocument::from_json(raw).unwrap().build().unwrap_err();
        assert!(matches!(err, AuthzError::Configuration(_)));
    }

    #[test]
    fn role_without_effective_permissions_is_rejected() {
        let raw = r#"{
            "roles": {
                "viewer": { "level": 1 },
                "admin":  { "level": 2, "grants": ["task:read"] },
                "owner":  { "level": 3 }
            }
        }"#;
        let err = PolicyDocument::from_json(raw).unwrap().build().unwrap_err();
        assert!(matches!(err, AuthzError::Configuration(_)));
    }

    #[test]
    fn custom_operation_table_is_kept() {
        let raw = r#"{
            "roles": {
                "viewer": { "level": 1, "grants": ["task:read"] },
                "admin":  { "level": 2 },
                "owner":  { "level": 3 }
            },
            "operations": { "tasks.create": { "roles": ["owner"] } }
        }"#;
        let (policy, ops) = PolicyDocument::from_json(raw).unwrap().build().unwrap();
        assert_eq!(policy.permissions_of(Role::Owner).len(), 1);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops.requirements(&TASKS_CREATE).unwrap().roles, vec![Role::Owner]);
    }

    #[test]
    fn summary_lists_roles_in_ascending_order() {
        let summary = AccessPolicy::standard().summary();
        let names: Vec<Role> = summary.roles.iter().map(|r| r.name).collect();
        assert_eq!(names, vec![Role::Viewer, Role::Admin, Role::Owner]);
        assert_eq!(summary.permissions.len(), Permission::ALL.len());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["roles"][0]["name"], "viewer");
    }
}
