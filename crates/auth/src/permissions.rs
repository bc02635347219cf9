use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AuthzError;

/// Named capability a role may be granted.
///
/// Permissions are immutable symbols from a closed set; nothing creates them
/// at runtime. The wire form is `resource:action`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "task:create")]
    TaskCreate,
    #[serde(rename = "task:read")]
    TaskRead,
    #[serde(rename = "task:update")]
    TaskUpdate,
    #[serde(rename = "task:delete")]
    TaskDelete,
    #[serde(rename = "audit:read")]
    AuditRead,
    #[serde(rename = "user:manage")]
    UserManage,
    #[serde(rename = "org:manage")]
    OrgManage,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::TaskCreate,
        Permission::TaskRead,
        Permission::TaskUpdate,
        Permission::TaskDelete,
        Permission::AuditRead,
        Permission::UserManage,
        Permission::OrgManage,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::TaskCreate => "task:create",
            Permission::TaskRead => "task:read",
            Permission::TaskUpdate => "task:update",
            Permission::TaskDelete => "task:delete",
            Permission::AuditRead => "audit:read",
            Permission::UserManage => "user:manage",
            Permission::OrgManage => "org:manage",
        }
    }

    /// Resource part of the tag (`task`, `audit`, ...).
    pub fn category(&self) -> &'static str {
        let s = self.as_str();
        match s.split_once(':') {
            Some((resource, _)) => resource,
            None => s,
        }
    }

    pub fn description(&self) -> String {
        let (resource, action) = self.as_str().split_once(':').unwrap_or((self.as_str(), ""));
        let action_desc = match action {
            "read" => "View/list",
            "create" => "Create new",
            "update" => "Modify",
            "delete" => "Delete",
            "manage" => "Administer",
            other => other,
        };
        format!("{action_desc} {resource} resources")
    }
}

impl FromStr for Permission {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AuthzError::configuration(format!("unknown permission '{s}'")))
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_round_trips_through_from_str_and_serde() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
            assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{}\"", p.as_str()));
        }
    }

    #[test]
    fn unknown_permission_is_a_configuration_error() {
        assert!(matches!(
            "task:archive".parse::<Permission>(),
            Err(AuthzError::Configuration(_))
        ));
    }

    #[test]
    fn category_and_description() {
        assert_eq!(Permission::AuditRead.category(), "audit");
        assert_eq!(Permission::OrgManage.description(), "Administer org resources");
    }
}
