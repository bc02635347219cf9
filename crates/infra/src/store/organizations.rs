use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tasktrack_core::{DomainError, OrganizationId};
use tasktrack_tenancy::{DirectoryError, Organization, OrganizationDirectory};

use super::StoreError;

/// Writable organization store. Reads go through [`OrganizationDirectory`].
#[async_trait]
pub trait OrganizationStore: OrganizationDirectory {
    /// Create an organization. A parent must exist and must itself be a root
    /// (the tree is at most two levels deep).
    async fn create(
        &self,
        name: String,
        parent_id: Option<OrganizationId>,
    ) -> Result<Organization, StoreError>;

    /// Every organization, sorted by name.
    async fn list(&self) -> Result<Vec<Organization>, StoreError>;
}

/// In-memory organization graph for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrganizationStore {
    inner: RwLock<HashMap<OrganizationId, Organization>>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, org: Organization) -> Result<Organization, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if map.contains_key(&org.id) {
            return Err(StoreError::Duplicate(org.id.to_string()));
        }

        if let Some(parent_id) = org.parent_id {
            let parent = map
                .get_mut(&parent_id)
                .ok_or_else(|| DomainError::not_found(format!("organization {parent_id}")))?;
            if !parent.is_root() {
                return Err(DomainError::invariant(
                    "organizations may only be nested one level below a root",
                )
                .into());
            }
            parent.child_ids.insert(org.id);
        }

        map.insert(org.id, org.clone());
        Ok(org)
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryOrganizationStore {
    async fn get_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, DirectoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| DirectoryError::Unavailable("store lock poisoned".into()))?;
        Ok(map.get(&id).cloned())
    }
}

#[async_trait]
impl OrganizationStore for InMemoryOrganizationStore {
    async fn create(
        &self,
        name: String,
        parent_id: Option<OrganizationId>,
    ) -> Result<Organization, StoreError> {
        let id = OrganizationId::new();
        let org = match parent_id {
            Some(parent) => Organization::child(id, name, parent),
            None => Organization::root(id, name),
        };
        self.insert(org)
    }

    async fn list(&self) -> Result<Vec<Organization>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut out: Vec<Organization> = map.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}
