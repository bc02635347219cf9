use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tasktrack_core::{Entity, OrganizationId};

/// A node in the organization tree.
///
/// # Invariants
/// - `parent_id == None` ⇒ root organization.
/// - The organization graph is a forest of depth ≤ 2: a child never has
///   children of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub parent_id: Option<OrganizationId>,
    /// Direct children, derived from the other nodes' `parent_id`.
    #[serde(default)]
    pub child_ids: BTreeSet<OrganizationId>,
}

impl Organization {
    pub fn root(id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
            child_ids: BTreeSet::new(),
        }
    }

    pub fn child(id: OrganizationId, name: impl Into<String>, parent_id: OrganizationId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
            child_ids: BTreeSet::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Entity for Organization {
    type Id = OrganizationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
