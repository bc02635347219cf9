//! Permission registry: role → granted permissions.

use std::collections::{BTreeMap, BTreeSet};

use crate::{AuthzError, Permission, Role, RoleHierarchy};

/// Immutable mapping from role to its effective permission set.
///
/// Sets are cumulative: a role holds its own grants plus everything granted to
/// roles below it in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionSet {
    sets: [BTreeSet<Permission>; Role::ALL.len()],
}

impl RolePermissionSet {
    /// Default grants: Viewer reads tasks, Admin manages tasks and reads the
    /// audit trail, Owner manages users and organizations.
    pub fn standard(hierarchy: &RoleHierarchy) -> Self {
        let grants = BTreeMap::from([
            (Role::Viewer, BTreeSet::from([Permission::TaskRead])),
            (
                Role::Admin,
                BTreeSet::from([
                    Permission::TaskCreate,
                    Permission::TaskUpdate,
                    Permission::TaskDelete,
                    Permission::AuditRead,
                ]),
            ),
            (
                Role::Owner,
                BTreeSet::from([Permission::UserManage, Permission::OrgManage]),
            ),
        ]);
        Self::inherited(hierarchy, &grants)
    }

    /// Build effective sets by walking the hierarchy bottom-up and
    /// accumulating each role's own grants.
    pub fn inherited(
        hierarchy: &RoleHierarchy,
        grants: &BTreeMap<Role, BTreeSet<Permission>>,
    ) -> Self {
        let mut sets: [BTreeSet<Permission>; Role::ALL.len()] = Default::default();
        let mut acc = BTreeSet::new();
        for role in hierarchy.ascending() {
            if let Some(own) = grants.get(&role) {
                acc.extend(own.iter().copied());
            }
            sets[role.index()] = acc.clone();
        }
        Self { sets }
    }

    pub fn permissions_of(&self, role: Role) -> &BTreeSet<Permission> {
        &self.sets[role.index()]
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.permissions_of(role).contains(&permission)
    }

    /// Check the registry contract against a hierarchy: every set is
    /// non-empty and each role's set includes the sets of all roles below it.
    pub fn verify(&self, hierarchy: &RoleHierarchy) -> Result<(), AuthzError> {
        let ordered = hierarchy.ascending();
        for role in &ordered {
            if self.permissions_of(*role).is_empty() {
                return Err(AuthzError::configuration(format!(
                    "role '{role}' grants no permissions"
                )));
            }
        }
        for pair in ordered.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if !self
                .permissions_of(lower)
                .is_subset(self.permissions_of(higher))
            {
                return Err(AuthzError::configuration(format!(
                    "role '{higher}' does not inherit every permission of '{lower}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> RolePermissionSet {
        RolePermissionSet::standard(&RoleHierarchy::standard())
    }

    #[test]
    fn viewer_reads_tasks_only() {
        let reg = standard();
        assert_eq!(
            reg.permissions_of(Role::Viewer),
            &BTreeSet::from([Permission::TaskRead])
        );
    }

    #[test]
    fn admin_adds_task_writes_and_audit_read() {
        let reg = standard();
        let added: BTreeSet<_> = reg
            .permissions_of(Role::Admin)
            .difference(reg.permissions_of(Role::Viewer))
            .copied()
            .collect();
        assert_eq!(
            added,
            BTreeSet::from([
                Permission::TaskCreate,
                Permission::TaskUpdate,
                Permission::TaskDelete,
                Permission::AuditRead,
            ])
        );
    }

    #[test]
    fn owner_adds_user_and_org_management() {
        let reg = standard();
        let added: BTreeSet<_> = reg
            .permissions_of(Role::Owner)
            .difference(reg.permissions_of(Role::Admin))
            .copied()
            .collect();
        assert_eq!(
            added,
            BTreeSet::from([Permission::UserManage, Permission::OrgManage])
        );
        assert!(!reg.has_permission(Role::Admin, Permission::OrgManage));
    }

    #[test]
    fn inheritance_is_strictly_monotonic() {
        let reg = standard();
        let viewer = reg.permissions_of(Role::Viewer);
        let admin = reg.permissions_of(Role::Admin);
        let owner = reg.permissions_of(Role::Owner);
        assert!(viewer.is_subset(admin) && viewer.len() < admin.len());
        assert!(admin.is_subset(owner) && admin.len() < owner.len());
        assert!(reg.verify(&RoleHierarchy::standard()).is_ok());
    }

    #[test]
    fn verify_rejects_empty_sets() {
        let grants = BTreeMap::from([(Role::Admin, BTreeSet::from([Permission::TaskRead]))]);
        let reg = RolePermissionSet::inherited(&RoleHierarchy::standard(), &grants);
        assert!(matches!(
            reg.verify(&RoleHierarchy::standard()),
            Err(AuthzError::Configuration(_))
        ));
    }

    #[test]
    fn verify_rejects_non_monotonic_tables() {
        // Admin lacks the Viewer's task:read.
        let reg = RolePermissionSet {
            sets: [
                BTreeSet::from([Permission::TaskRead]),
                BTreeSet::from([Permission::TaskCreate]),
                BTreeSet::from([Permission::TaskRead, Permission::TaskCreate]),
            ],
        };
        assert!(matches!(
            reg.verify(&RoleHierarchy::standard()),
            Err(AuthzError::Configuration(_))
        ));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: has_permission agrees with set membership for every pair.
            #[test]
            fn has_permission_matches_membership(
                role in prop::sample::select(Role::ALL.to_vec()),
                perm in prop::sample::select(Permission::ALL.to_vec()),
            ) {
                let reg = standard();
                prop_assert!(!reg.permissions_of(role).is_empty());
                prop_assert_eq!(
                    reg.has_permission(role, perm),
                    reg.permissions_of(role).contains(&perm)
                );
            }

            /// Property: any grant table yields a monotonic registry under inheritance.
            #[test]
            fn inherited_tables_are_monotonic(
                viewer in prop::collection::btree_set(prop::sample::select(Permission::ALL.to_vec()), 1..4),
                admin in prop::collection::btree_set(prop::sample::select(Permission::ALL.to_vec()), 0..4),
                owner in prop::collection::btree_set(prop::sample::select(Permission::ALL.to_vec()), 0..4),
            ) {
                let h = RoleHierarchy::standard();
                let grants = BTreeMap::from([
                    (Role::Viewer, viewer),
                    (Role::Admin, admin),
                    (Role::Owner, owner),
                ]);
                let reg = RolePermissionSet::inherited(&h, &grants);
                prop_assert!(reg.verify(&h).is_ok());
            }
        }
    }
}
