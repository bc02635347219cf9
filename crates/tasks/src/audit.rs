use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tasktrack_auth::{Principal, Role};
use tasktrack_core::{AuditEntryId, Entity, OrganizationId, UserId};
use tasktrack_tenancy::ScopedResource;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Login,
    LoginFailed,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Read => "READ",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
            AuditAction::LoginFailed => "LOGIN_FAILED",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the acting user at the time the entry was written.
///
/// Later role changes do not rewrite history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditAuthor {
    pub user_id: UserId,
    pub role: Role,
    pub organization_id: OrganizationId,
}

impl From<&Principal> for AuditAuthor {
    fn from(p: &Principal) -> Self {
        Self {
            user_id: p.id,
            role: p.role,
            organization_id: p.organization_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub author: AuditAuthor,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for AuditEntry {
    type Id = AuditEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ScopedResource for AuditEntry {
    fn organization_id(&self) -> OrganizationId {
        self.author.organization_id
    }

    fn author_role(&self) -> Option<Role> {
        Some(self.author.role)
    }
}

/// Input for appending to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub author: AuditAuthor,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    pub fn new(author: impl Into<AuditAuthor>, action: AuditAction, resource: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            action,
            resource: resource.into(),
            resource_id: None,
            details: None,
            ip_address: None,
        }
    }

    pub fn resource_id(mut self, id: impl ToString) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn ip_address(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    pub fn into_entry(self, id: AuditEntryId, created_at: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            author: self.author,
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            details: self.details,
            ip_address: self.ip_address,
            created_at,
        }
    }
}
