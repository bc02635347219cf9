use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use tasktrack_core::{Entity, OrganizationId, TaskId, UserId};
use tasktrack_tenancy::ScopedResource;

use crate::sanitize_text;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    #[default]
    Work,
    Personal,
    Urgent,
    Other,
}

impl TaskStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl TaskCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Personal => "personal",
            TaskCategory::Urgent => "urgent",
            TaskCategory::Other => "other",
        }
    }
}

/// A task. Belongs to exactly one organization for its whole life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub category: TaskCategory,
    pub position: i64,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: UserId,
    pub organization_id: OrganizationId,
    pub created_by_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Apply a partial update. Text fields are sanitized; the organization
    /// is never touched.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = sanitize_text(title);
        }
        if let Some(description) = &patch.description {
            self.description = sanitize_text(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        self.updated_at = now;
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl ScopedResource for Task {
    fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    fn assignee_id(&self) -> Option<UserId> {
        Some(self.assignee_id)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Defaults to the creator.
    #[serde(default)]
    pub assignee_id: Option<UserId>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves a field unchanged; for the date fields,
/// `Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
    pub start_date: Option<Option<NaiveDate>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee_id: Option<UserId>,
    pub position: Option<i64>,
}

impl TaskPatch {
    /// Names of the fields this patch sets, for the audit trail.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.title.is_some() {
            out.push("title");
        }
        if self.description.is_some() {
            out.push("description");
        }
        if self.status.is_some() {
            out.push("status");
        }
        if self.category.is_some() {
            out.push("category");
        }
        if self.start_date.is_some() {
            out.push("start_date");
        }
        if self.due_date.is_some() {
            out.push("due_date");
        }
        if self.assignee_id.is_some() {
            out.push("assignee_id");
        }
        if self.position.is_some() {
            out.push("position");
        }
        out
    }
}

/// Caller-supplied filters, applied after the scoping predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

impl TaskFilters {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != task.category) {
            return false;
        }
        match self.normalized_search() {
            Some(needle) => {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Sanitized, lower-cased search term; `None` when absent or blank.
    pub fn normalized_search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(sanitize_text)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::new(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            category: TaskCategory::Work,
            position: 0,
            start_date: None,
            due_date: None,
            assignee_id: UserId::new(),
            organization_id: OrganizationId::new(),
            created_by_id: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn filters_combine() {
        let t = task("Quarterly Report");
        assert!(TaskFilters::default().matches(&t));
        let f = TaskFilters {
            status: Some(TaskStatus::Todo),
            search: Some("report".into()),
            ..TaskFilters::default()
        };
        assert!(f.matches(&t));
        let f = TaskFilters {
            category: Some(TaskCategory::Urgent),
            ..TaskFilters::default()
        };
        assert!(!f.matches(&t));
    }

    #[test]
    fn blank_search_matches_everything() {
        let f = TaskFilters {
            search: Some("   ".into()),
            ..TaskFilters::default()
        };
        assert!(f.matches(&task("anything")));
    }

    #[test]
    fn patch_sanitizes_and_keeps_organization() {
        let mut t = task("old");
        let org = t.organization_id;
        let patch = TaskPatch {
            title: Some(" <i>new</i> ".into()),
            due_date: Some(None),
            position: Some(4),
            ..TaskPatch::default()
        };
        t.apply(&patch, Utc::now());
        assert_eq!(t.title, "&lt;i&gt;new&lt;/i&gt;");
        assert_eq!(t.position, 4);
        assert_eq!(t.organization_id, org);
        assert_eq!(patch.field_names(), vec!["title", "due_date", "position"]);
    }

    #[test]
    fn status_uses_snake_case() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}
