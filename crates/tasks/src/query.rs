use tasktrack_tenancy::{Columns, Predicate, SqlFilter, SqlParam};

use crate::{Task, TaskFilters, escape_like};

/// Scoping predicate composed with caller filters.
///
/// The scope always runs first; filters can only narrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub scope: Predicate,
    pub filters: TaskFilters,
}

impl TaskQuery {
    pub fn new(scope: Predicate, filters: TaskFilters) -> Self {
        Self { scope, filters }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.scope.matches(task) && self.filters.matches(task)
    }

    /// Full Postgres `WHERE` clause, parameters numbered from `$1`.
    pub fn to_sql(&self) -> SqlFilter {
        let SqlFilter { clause, mut params } = self.scope.to_sql(&Columns::TASKS, 1);
        let mut clauses = vec![clause];

        if let Some(status) = self.filters.status {
            let s = push(&mut params, SqlParam::Text(status.as_str().to_string()));
            clauses.push(format!("task.status = {s}"));
        }
        if let Some(category) = self.filters.category {
            let s = push(&mut params, SqlParam::Text(category.as_str().to_string()));
            clauses.push(format!("task.category = {s}"));
        }
        if let Some(search) = self.filters.normalized_search() {
            let s = push(&mut params, SqlParam::Text(format!("%{}%", escape_like(&search))));
            clauses.push(format!("(task.title ILIKE {s} OR task.description ILIKE {s})"));
        }

        SqlFilter {
            clause: clauses.join(" AND "),
            params,
        }
    }
}

fn push(params: &mut Vec<SqlParam>, value: SqlParam) -> String {
    params.push(value);
    format!("${}", params.len())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tasktrack_core::{OrganizationId, UserId};

    use super::*;
    use crate::TaskStatus;

    #[test]
    fn scope_comes_first_and_filters_follow() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let scope = Predicate::OrganizationIn(BTreeSet::from([org])).and(Predicate::AssigneeIs(user));
        let query = TaskQuery::new(
            scope,
            TaskFilters {
                status: Some(TaskStatus::Done),
                search: Some("50%".into()),
                ..TaskFilters::default()
            },
        );

        let sql = query.to_sql();
        assert_eq!(
            sql.clause,
            "(task.organization_id IN ($1) AND task.assignee_id = $2) AND task.status = $3 \
             AND (task.title ILIKE $4 OR task.description ILIKE $4)"
        );
        assert_eq!(sql.params[2], SqlParam::Text("done".into()));
        assert_eq!(sql.params[3], SqlParam::Text("%50\\%%".into()));
    }
}
