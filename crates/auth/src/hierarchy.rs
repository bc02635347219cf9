//! Role hierarchy comparator.

use std::collections::{BTreeMap, BTreeSet};

use crate::{AuthzError, Role};

/// Total order over roles, expressed as integer privilege levels.
///
/// # Invariants
/// - every role has a level (enforced by the fixed-size table);
/// - `level(Viewer) < level(Admin) < level(Owner)`; the values may vary but
///   the order may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    levels: [u32; Role::ALL.len()],
}

impl RoleHierarchy {
    /// Viewer=1, Admin=2, Owner=3.
    pub fn standard() -> Self {
        Self { levels: [1, 2, 3] }
    }

    /// Build a hierarchy from an explicit level table.
    ///
    /// Every role must be present and levels must strictly increase from
    /// Viewer through Admin to Owner.
    pub fn from_levels(levels: &BTreeMap<Role, u32>) -> Result<Self, AuthzError> {
        let mut table = [0u32; Role::ALL.len()];
        for role in Role::ALL {
            let level = levels
                .get(&role)
                .ok_or_else(|| AuthzError::configuration(format!("role '{role}' has no level")))?;
            table[role.index()] = *level;
        }

        for pair in Role::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            if table[lower.index()] >= table[higher.index()] {
                return Err(AuthzError::configuration(format!(
                    "role '{higher}' must have a higher level than '{lower}'"
                )));
            }
        }

        Ok(Self { levels: table })
    }

    pub fn level(&self, role: Role) -> u32 {
        self.levels[role.index()]
    }

    /// `level(candidate) >= level(required)`.
    pub fn is_at_least(&self, candidate: Role, required: Role) -> bool {
        self.level(candidate) >= self.level(required)
    }

    /// Roles whose level does not exceed `role`'s (including `role` itself).
    pub fn at_or_below(&self, role: Role) -> BTreeSet<Role> {
        let ceiling = self.level(role);
        Role::ALL
            .into_iter()
            .filter(|r| self.level(*r) <= ceiling)
            .collect()
    }

    /// Roles from least to most privileged.
    pub fn ascending(&self) -> Vec<Role> {
        let mut roles = Role::ALL.to_vec();
        roles.sort_by_key(|r| self.level(*r));
        roles
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::standard()
    }
}
