use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthzError;

/// Privilege tier assigned to a user.
///
/// The set is closed. Ordering between roles is *not* derived from the enum;
/// it comes from the [`RoleHierarchy`](crate::RoleHierarchy) carried by the
/// active policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Viewer,
    Admin,
    Owner,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Admin, Role::Owner];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }

    /// Dense index into per-role tables.
    pub(crate) const fn index(self) -> usize {
        match self {
            Role::Viewer => 0,
            Role::Admin => 1,
            Role::Owner => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Viewer => "Read-only access to tasks assigned to the user",
            Role::Admin => "Manages tasks and reads the audit trail of its organizations",
            Role::Owner => "Full control, including users and organizations",
        }
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AuthzError::configuration(format!("unknown role '{s}'")))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
