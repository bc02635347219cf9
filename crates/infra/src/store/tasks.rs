use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tasktrack_core::{DomainError, OrganizationId, TaskId};
use tasktrack_tasks::{Task, TaskQuery};

use super::StoreError;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: Task) -> Result<(), StoreError>;

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Replace an existing task.
    async fn update(&self, task: Task) -> Result<(), StoreError>;

    async fn remove(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Tasks matching `query`, ordered by position (ascending).
    async fn query(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError>;

    /// Highest position used in an organization, if it has any task.
    async fn max_position(&self, organization_id: OrganizationId) -> Result<Option<i64>, StoreError>;
}

/// In-memory task store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    inner: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if map.contains_key(&task.id) {
            return Err(StoreError::Duplicate(task.id.to_string()));
        }
        map.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn update(&self, task: Task) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        match map.get_mut(&task.id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(DomainError::not_found(format!("task {}", task.id)).into()),
        }
    }

    async fn remove(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(&id))
    }

    async fn query(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut out: Vec<Task> = map.values().filter(|t| query.matches(t)).cloned().collect();
        out.sort_by(|a, b| a.position.cmp(&b.position).then(a.created_at.cmp(&b.created_at)));
        Ok(out)
    }

    async fn max_position(&self, organization_id: OrganizationId) -> Result<Option<i64>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map
            .values()
            .filter(|t| t.organization_id == organization_id)
            .map(|t| t.position)
            .max())
    }
}
