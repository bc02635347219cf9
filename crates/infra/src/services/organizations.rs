use std::sync::Arc;

use tasktrack_auth::Principal;
use tasktrack_auth::operations::{ORGANIZATIONS_CREATE, ORGANIZATIONS_LIST};
use tasktrack_core::{DomainError, OrganizationId};
use tasktrack_tasks::{AuditAction, NewAuditEntry, sanitize_text};
use tasktrack_tenancy::Organization;

use super::{AccessEngine, AuditService, ServiceError};
use crate::store::OrganizationStore;

const MAX_NAME_LEN: usize = 255;

#[derive(Clone)]
pub struct OrganizationService {
    engine: AccessEngine,
    store: Arc<dyn OrganizationStore>,
    audit: AuditService,
}

impl OrganizationService {
    pub fn new(engine: AccessEngine, store: Arc<dyn OrganizationStore>, audit: AuditService) -> Self {
        Self {
            engine,
            store,
            audit,
        }
    }

    /// Organizations within the caller's accessible set, sorted by name.
    pub async fn list(&self, principal: Option<&Principal>) -> Result<Vec<Organization>, ServiceError> {
        let principal = self.engine.authorize(principal, &ORGANIZATIONS_LIST)?;
        let accessible = self.engine.accessible(principal).await?;

        let mut out = self.store.list().await?;
        out.retain(|org| accessible.contains(&org.id));
        Ok(out)
    }

    /// Create a child organization under a parent the caller can reach.
    ///
    /// Top-level organizations are provisioned directly through the store.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        name: &str,
        parent_id: Option<OrganizationId>,
        ip_address: Option<String>,
    ) -> Result<Organization, ServiceError> {
        let principal = self.engine.authorize(principal, &ORGANIZATIONS_CREATE)?;

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("organization name must not be empty").into());
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "organization name exceeds {MAX_NAME_LEN} characters"
            ))
            .into());
        }

        let Some(parent_id) = parent_id else {
            return Err(ServiceError::forbidden(
                "top-level organizations cannot be created through the service",
            ));
        };
        let accessible = self.engine.accessible(principal).await?;
        if !accessible.contains(&parent_id) {
            return Err(ServiceError::forbidden(
                "parent organization is outside your scope",
            ));
        }

        let org = self.store.create(sanitize_text(trimmed), Some(parent_id)).await?;

        self.audit
            .record_committed(
                NewAuditEntry::new(principal, AuditAction::Create, "organization")
                    .resource_id(org.id)
                    .details(format!("Created organization: {}", org.name))
                    .ip_address(ip_address),
            )
            .await;

        Ok(org)
    }
}
