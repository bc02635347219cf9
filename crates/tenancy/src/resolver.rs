//! Organization tree resolver.
//!
//! Visibility flows downward only: a root sees itself and its direct
//! children, a child sees only itself. An unknown organization sees only
//! itself.

use std::collections::BTreeSet;

use serde::Serialize;

use tasktrack_core::OrganizationId;

use crate::{Organization, OrganizationDirectory, ScopeError};

/// Set of organization ids whose records a caller may see.
///
/// Never empty: the home organization is always a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessibleOrganizations(BTreeSet<OrganizationId>);

impl AccessibleOrganizations {
    pub fn only(id: OrganizationId) -> Self {
        Self(BTreeSet::from([id]))
    }

    /// Home organization plus `children`.
    pub fn with_children(
        home: OrganizationId,
        children: impl IntoIterator<Item = OrganizationId>,
    ) -> Self {
        let mut ids = BTreeSet::from([home]);
        ids.extend(children);
        Self(ids)
    }

    pub fn contains(&self, id: &OrganizationId) -> bool {
        self.0.contains(id)
    }

    pub fn ids(&self) -> &BTreeSet<OrganizationId> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_ids(self) -> BTreeSet<OrganizationId> {
        self.0
    }
}

/// Apply the visibility rule to an already looked-up node.
pub fn accessible_from(home: OrganizationId, node: Option<&Organization>) -> AccessibleOrganizations {
    match node {
        Some(org) if org.is_root() => {
            AccessibleOrganizations::with_children(home, org.child_ids.iter().copied())
        }
        _ => AccessibleOrganizations::only(home),
    }
}

/// Resolves accessible organizations with one directory lookup per call.
///
/// No caching; wrap the directory if you need it.
#[derive(Debug, Clone)]
pub struct OrganizationTreeResolver<D> {
    directory: D,
}

impl<D: OrganizationDirectory> OrganizationTreeResolver<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub async fn accessible_org_ids(
        &self,
        home: OrganizationId,
    ) -> Result<AccessibleOrganizations, ScopeError> {
        let node = self.directory.get_organization(home).await?;
        if node.is_none() {
            tracing::warn!(organization_id = %home, "unknown organization; scoping to itself");
        }
        let accessible = accessible_from(home, node.as_ref());
        tracing::debug!(
            organization_id = %home,
            accessible = accessible.len(),
            "resolved accessible organizations"
        );
        Ok(accessible)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::DirectoryError;

    struct FixedDirectory(HashMap<OrganizationId, Organization>);

    #[async_trait]
    impl OrganizationDirectory for FixedDirectory {
        async fn get_organization(
            &self,
            id: OrganizationId,
        ) -> Result<Option<Organization>, DirectoryError> {
            Ok(self.0.get(&id).cloned())
        }
    }

    struct DownDirectory;

    #[async_trait]
    impl OrganizationDirectory for DownDirectory {
        async fn get_organization(
            &self,
            _id: OrganizationId,
        ) -> Result<Option<Organization>, DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".into()))
        }
    }

    fn tree() -> (FixedDirectory, OrganizationId, OrganizationId, OrganizationId) {
        let p = OrganizationId::new();
        let c1 = OrganizationId::new();
        let c2 = OrganizationId::new();

        let mut root = Organization::root(p, "Parent");
        root.child_ids.extend([c1, c2]);
        let dir = FixedDirectory(HashMap::from([
            (p, root),
            (c1, Organization::child(c1, "Engineering", p)),
            (c2, Organization::child(c2, "Marketing", p)),
        ]));
        (dir, p, c1, c2)
    }

    #[tokio::test]
    async fn root_sees_itself_and_direct_children() {
        let (dir, p, c1, c2) = tree();
        let resolver = OrganizationTreeResolver::new(dir);
        let ids = resolver.accessible_org_ids(p).await.unwrap();
        assert_eq!(ids.into_ids(), BTreeSet::from([p, c1, c2]));
    }

    #[tokio::test]
    async fn child_sees_only_itself() {
        let (dir, _p, c1, c2) = tree();
        let resolver = OrganizationTreeResolver::new(dir);
        assert_eq!(
            resolver.accessible_org_ids(c1).await.unwrap(),
            AccessibleOrganizations::only(c1)
        );
        assert_eq!(
            resolver.accessible_org_ids(c2).await.unwrap(),
            AccessibleOrganizations::only(c2)
        );
    }

    #[tokio::test]
    async fn unknown_organization_fails_closed_to_itself() {
        let (dir, ..) = tree();
        let resolver = OrganizationTreeResolver::new(dir);
        let stranger = OrganizationId::new();
        assert_eq!(
            resolver.accessible_org_ids(stranger).await.unwrap(),
            AccessibleOrganizations::only(stranger)
        );
    }

    #[tokio::test]
    async fn directory_failure_is_propagated() {
        let resolver = OrganizationTreeResolver::new(DownDirectory);
        let err = resolver.accessible_org_ids(OrganizationId::new()).await.unwrap_err();
        assert!(matches!(err, ScopeError::Directory(DirectoryError::Unavailable(_))));
    }

    #[test]
    fn child_listing_children_does_not_widen_scope() {
        // A malformed child record that claims children still sees only itself.
        let c = OrganizationId::new();
        let mut node = Organization::child(c, "Child", OrganizationId::new());
        node.child_ids.insert(OrganizationId::new());
        assert_eq!(accessible_from(c, Some(&node)), AccessibleOrganizations::only(c));
    }
}
