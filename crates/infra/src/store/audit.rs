use std::sync::RwLock;

use async_trait::async_trait;

use tasktrack_tasks::AuditEntry;
use tasktrack_tenancy::{Page, PageRequest, Predicate};

use super::StoreError;

/// Append-only audit trail.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError>;

    /// Entries matching `scope`, newest first, then paginated.
    async fn page(&self, scope: &Predicate, page: PageRequest) -> Result<Page<AuditEntry>, StoreError>;
}

/// In-memory audit trail for tests/dev. Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    inner: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append(&self, entry: AuditEntry) -> Result<(), StoreError> {
        let mut entries = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        entries.push(entry);
        Ok(())
    }

    async fn page(&self, scope: &Predicate, page: PageRequest) -> Result<Page<AuditEntry>, StoreError> {
        let entries = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        // Reverse insertion order first so equal timestamps stay newest-first
        // under the stable sort.
        let mut visible: Vec<AuditEntry> = entries
            .iter()
            .rev()
            .filter(|e| scope.matches(*e))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.apply(visible))
    }
}
