//! Access scoping filter: organization scope + role-level visibility rules.

use core::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tasktrack_auth::{AccessPolicy, AuthzError, Principal, Role};
use tasktrack_core::OrganizationId;

use crate::{
    AccessibleOrganizations, OrganizationDirectory, OrganizationTreeResolver, Predicate,
    ScopeError,
};

/// Resource collections subject to scoping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Task,
    Audit,
}

impl ResourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::Audit => "audit",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(ResourceKind::Task),
            "audit" => Ok(ResourceKind::Audit),
            other => Err(AuthzError::configuration(format!("unknown resource kind '{other}'"))),
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the visibility predicate for `principal` over `kind`.
///
/// Tasks: organization scope; Viewers additionally only see tasks assigned
/// to them.
///
/// Audit entries: organization scope on the author's organization; anyone
/// but an Owner additionally only sees entries whose author's level does not
/// exceed their own.
pub fn scope_predicate(
    policy: &AccessPolicy,
    principal: &Principal,
    kind: ResourceKind,
    accessible: &AccessibleOrganizations,
) -> Predicate {
    let base = Predicate::OrganizationIn(accessible.ids().clone());
    match kind {
        ResourceKind::Task => match principal.role {
            Role::Viewer => base.and(Predicate::AssigneeIs(principal.id)),
            Role::Admin | Role::Owner => base,
        },
        ResourceKind::Audit => match principal.role {
            Role::Owner => base,
            role => base.and(Predicate::AuthorRoleIn(policy.hierarchy().at_or_below(role))),
        },
    }
}

/// Resolver + policy, producing ready-to-apply predicates.
#[derive(Debug, Clone)]
pub struct ScopingFilter<D> {
    policy: Arc<AccessPolicy>,
    resolver: OrganizationTreeResolver<D>,
}

impl<D: OrganizationDirectory> ScopingFilter<D> {
    pub fn new(policy: Arc<AccessPolicy>, directory: D) -> Self {
        Self {
            policy,
            resolver: OrganizationTreeResolver::new(directory),
        }
    }

    pub async fn accessible_org_ids(
        &self,
        organization_id: OrganizationId,
    ) -> Result<AccessibleOrganizations, ScopeError> {
        self.resolver.accessible_org_ids(organization_id).await
    }

    pub async fn predicate(
        &self,
        principal: &Principal,
        kind: ResourceKind,
    ) -> Result<Predicate, ScopeError> {
        let accessible = self.accessible_org_ids(principal.organization_id).await?;
        let predicate = scope_predicate(&self.policy, principal, kind, &accessible);
        tracing::debug!(
            principal = %principal.id,
            role = %principal.role,
            kind = %kind,
            fields = ?predicate.fields(),
            "built scoping predicate"
        );
        Ok(predicate)
    }
}
