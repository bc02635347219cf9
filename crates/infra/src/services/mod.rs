//! Application services: guard first, then scope, then caller filters.
//!
//! These are the reference composition of the engine. An HTTP layer calls
//! them with the request principal (or `None` when unauthenticated) and maps
//! [`ServiceError`] onto responses.

pub mod audit;
pub mod organizations;
pub mod tasks;

use std::sync::Arc;

use thiserror::Error;

use tasktrack_auth::{AccessPolicy, AuthzError, Guard, OperationId, Principal};
use tasktrack_core::DomainError;
use tasktrack_tenancy::{AccessibleOrganizations, Predicate, ResourceKind, ScopeError, ScopingFilter};

use crate::config::EngineConfig;
use crate::store::{AuditRepository, OrganizationStore, StoreError, TaskRepository};

pub use audit::AuditService;
pub use organizations::OrganizationService;
pub use tasks::TaskService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ServiceError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Authz(AuthzError::forbidden(msg))
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(what))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ServiceError::Authz(AuthzError::Forbidden(_)))
    }
}

/// Guard + scoping filter, shared by every service.
#[derive(Clone)]
pub struct AccessEngine {
    guard: Guard,
    scoping: ScopingFilter<Arc<dyn OrganizationStore>>,
}

impl AccessEngine {
    pub fn new(config: &EngineConfig, organizations: Arc<dyn OrganizationStore>) -> Self {
        Self {
            guard: Guard::new(config.policy.clone(), config.operations.clone()),
            scoping: ScopingFilter::new(config.policy.clone(), organizations),
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        self.guard.policy()
    }

    /// Run the guard for `operation` and hand back the authenticated principal.
    pub fn authorize<'p>(
        &self,
        principal: Option<&'p Principal>,
        operation: &OperationId,
    ) -> Result<&'p Principal, ServiceError> {
        self.guard.authorize(principal, operation)?;
        principal.ok_or(ServiceError::Authz(AuthzError::Unauthenticated))
    }

    pub async fn accessible(
        &self,
        principal: &Principal,
    ) -> Result<AccessibleOrganizations, ServiceError> {
        Ok(self.scoping.accessible_org_ids(principal.organization_id).await?)
    }

    pub async fn predicate(
        &self,
        principal: &Principal,
        kind: ResourceKind,
    ) -> Result<Predicate, ServiceError> {
        Ok(self.scoping.predicate(principal, kind).await?)
    }
}

/// The full service set over one shared engine.
#[derive(Clone)]
pub struct Services {
    pub tasks: TaskService,
    pub audit: AuditService,
    pub organizations: OrganizationService,
}

impl Services {
    pub fn new(
        config: &EngineConfig,
        organizations: Arc<dyn OrganizationStore>,
        tasks: Arc<dyn TaskRepository>,
        audit: Arc<dyn AuditRepository>,
    ) -> Self {
        let engine = AccessEngine::new(config, organizations.clone());
        let audit = AuditService::new(engine.clone(), audit, config.audit_page_size);
        Self {
            tasks: TaskService::new(engine.clone(), tasks, audit.clone()),
            organizations: OrganizationService::new(engine, organizations, audit.clone()),
            audit,
        }
    }
}
