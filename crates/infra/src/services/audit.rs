use std::sync::Arc;

use chrono::Utc;

use tasktrack_auth::{Principal, operations::AUDIT_LIST};
use tasktrack_core::AuditEntryId;
use tasktrack_tasks::{AuditEntry, NewAuditEntry};
use tasktrack_tenancy::{Page, PageRequest, ResourceKind};

use super::{AccessEngine, ServiceError};
use crate::store::AuditRepository;

#[derive(Clone)]
pub struct AuditService {
    engine: AccessEngine,
    store: Arc<dyn AuditRepository>,
    default_limit: u32,
}

impl AuditService {
    pub fn new(engine: AccessEngine, store: Arc<dyn AuditRepository>, default_limit: u32) -> Self {
        Self {
            engine,
            store,
            default_limit,
        }
    }

    /// Append to the trail and mirror the entry to the `audit` log target.
    pub async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry, ServiceError> {
        let entry = entry.into_entry(AuditEntryId::new(), Utc::now());
        self.store.append(entry.clone()).await?;
        tracing::info!(
            target: "audit",
            action = %entry.action,
            resource = %entry.resource,
            resource_id = entry.resource_id.as_deref().unwrap_or(""),
            user_id = %entry.author.user_id,
            role = %entry.author.role,
            details = entry.details.as_deref().unwrap_or(""),
            "audit entry recorded"
        );
        Ok(entry)
    }

    /// Record an entry for a change that is already committed.
    ///
    /// The change stands even when the trail rejects the entry; the entry is
    /// then written to the `audit` log target at error level instead.
    pub async fn record_committed(&self, entry: NewAuditEntry) {
        if let Err(err) = self.record(entry.clone()).await {
            tracing::error!(
                target: "audit",
                error = %err,
                action = %entry.action,
                resource = %entry.resource,
                resource_id = entry.resource_id.as_deref().unwrap_or(""),
                user_id = %entry.author.user_id,
                role = %entry.author.role,
                details = entry.details.as_deref().unwrap_or(""),
                "audit entry not persisted"
            );
        }
    }

    /// Audit entries visible to the caller, newest first.
    ///
    /// `page`/`limit` are raw caller input; they are clamped, and `limit`
    /// falls back to the configured default.
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<AuditEntry>, ServiceError> {
        let principal = self.engine.authorize(principal, &AUDIT_LIST)?;
        let scope = self.engine.predicate(principal, ResourceKind::Audit).await?;
        let request = PageRequest::new(
            page.unwrap_or(1),
            limit.unwrap_or(i64::from(self.default_limit)),
        );
        Ok(self.store.page(&scope, request).await?)
    }
}
