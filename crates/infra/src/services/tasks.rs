use std::sync::Arc;

use chrono::Utc;

use tasktrack_auth::operations::{TASKS_CREATE, TASKS_DELETE, TASKS_LIST, TASKS_REORDER, TASKS_UPDATE};
use tasktrack_auth::{Principal, Role};
use tasktrack_core::{DomainError, TaskId};
use tasktrack_tasks::{
    AuditAction, NewAuditEntry, NewTask, Task, TaskFilters, TaskPatch, TaskQuery, sanitize_text,
};
use tasktrack_tenancy::ResourceKind;

use super::{AccessEngine, AuditService, ServiceError};
use crate::store::TaskRepository;

const MAX_TITLE_LEN: usize = 500;
const MAX_DESCRIPTION_LEN: usize = 5000;

#[derive(Clone)]
pub struct TaskService {
    engine: AccessEngine,
    tasks: Arc<dyn TaskRepository>,
    audit: AuditService,
}

impl TaskService {
    pub fn new(engine: AccessEngine, tasks: Arc<dyn TaskRepository>, audit: AuditService) -> Self {
        Self {
            engine,
            tasks,
            audit,
        }
    }

    pub async fn create(
        &self,
        principal: Option<&Principal>,
        input: NewTask,
        ip_address: Option<String>,
    ) -> Result<Task, ServiceError> {
        let principal = self.engine.authorize(principal, &TASKS_CREATE)?;

        let description = input.description.as_deref().unwrap_or("");
        validate_title(&input.title)?;
        validate_description(description)?;
        let title = sanitize_text(&input.title);
        let description = sanitize_text(description);

        let position = match self.tasks.max_position(principal.organization_id).await? {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                DomainError::validation("no task position left after the last task; reorder first")
            })?,
            None => 0,
        };

        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title,
            description,
            status: input.status.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            position,
            start_date: input.start_date,
            due_date: input.due_date,
            assignee_id: input.assignee_id.unwrap_or(principal.id),
            organization_id: principal.organization_id,
            created_by_id: principal.id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.clone()).await?;

        self.audit
            .record_committed(
                NewAuditEntry::new(principal, AuditAction::Create, "task")
                    .resource_id(task.id)
                    .details(format!("Created task: {}", task.title))
                    .ip_address(ip_address),
            )
            .await;

        Ok(task)
    }

    /// Tasks visible to the caller, narrowed by `filters`, ordered by position.
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        filters: TaskFilters,
    ) -> Result<Vec<Task>, ServiceError> {
        let principal = self.engine.authorize(principal, &TASKS_LIST)?;
        let scope = self.engine.predicate(principal, ResourceKind::Task).await?;
        Ok(self.tasks.query(&TaskQuery::new(scope, filters)).await?)
    }

    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: TaskId,
        patch: TaskPatch,
        ip_address: Option<String>,
    ) -> Result<Task, ServiceError> {
        let principal = self.engine.authorize(principal, &TASKS_UPDATE)?;
        let mut task = self.load_in_scope(principal, id).await?;
        self.require_role(principal, Role::Admin, "update tasks")?;

        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        if let Some(description) = &patch.description {
            validate_description(description)?;
        }

        task.apply(&patch, Utc::now());
        self.tasks.update(task.clone()).await?;

        self.audit
            .record_committed(
                NewAuditEntry::new(principal, AuditAction::Update, "task")
                    .resource_id(id)
                    .details(format!(
                        "Updated task: {} (fields: {})",
                        task.title,
                        patch.field_names().join(", ")
                    ))
                    .ip_address(ip_address),
            )
            .await;

        Ok(task)
    }

    /// Move a task to a new position. Same access rules as `update`.
    pub async fn reorder(
        &self,
        principal: Option<&Principal>,
        id: TaskId,
        position: i64,
    ) -> Result<Task, ServiceError> {
        let principal = self.engine.authorize(principal, &TASKS_REORDER)?;
        let mut task = self.load_in_scope(principal, id).await?;
        self.require_role(principal, Role::Admin, "reorder tasks")?;

        task.apply(
            &TaskPatch {
                position: Some(position),
                ..TaskPatch::default()
            },
            Utc::now(),
        );
        self.tasks.update(task.clone()).await?;
        Ok(task)
    }

    pub async fn delete(
        &self,
        principal: Option<&Principal>,
        id: TaskId,
        ip_address: Option<String>,
    ) -> Result<(), ServiceError> {
        let principal = self.engine.authorize(principal, &TASKS_DELETE)?;
        let task = self.load_in_scope(principal, id).await?;
        self.require_role(principal, Role::Admin, "delete tasks")?;

        self.tasks.remove(id).await?;

        self.audit
            .record_committed(
                NewAuditEntry::new(principal, AuditAction::Delete, "task")
                    .resource_id(id)
                    .details(format!("Deleted task: {}", task.title))
                    .ip_address(ip_address),
            )
            .await;

        Ok(())
    }

    /// Fetch a task and check that its organization is within the caller's scope.
    async fn load_in_scope(&self, principal: &Principal, id: TaskId) -> Result<Task, ServiceError> {
        let task = self
            .tasks
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("task {id}")))?;

        let accessible = self.engine.accessible(principal).await?;
        if !accessible.contains(&task.organization_id) {
            tracing::info!(
                principal = %principal.id,
                task = %id,
                organization_id = %task.organization_id,
                "task outside organization scope"
            );
            return Err(ServiceError::forbidden(
                "task belongs to an organization outside your scope",
            ));
        }
        Ok(task)
    }

    fn require_role(&self, principal: &Principal, required: Role, action: &str) -> Result<(), ServiceError> {
        if self.engine.policy().is_at_least(principal.role, required) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!(
                "role '{}' may not {action}; requires '{required}' or higher",
                principal.role
            )))
        }
    }
}

/// Lengths are checked on the trimmed input as the caller typed it, before
/// markup escaping.
fn validate_title(title: &str) -> Result<(), DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "title exceeds {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.trim().chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
