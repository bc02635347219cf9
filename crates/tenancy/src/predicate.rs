//! Visibility predicate over scoped records.
//!
//! A predicate is plain data: the in-memory stores evaluate it with
//! [`Predicate::matches`], SQL-backed stores render it with
//! [`Predicate::to_sql`].

use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use tasktrack_auth::Role;
use tasktrack_core::{OrganizationId, UserId};

/// Record fields the scoping engine reads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Owning organization (for audit entries: the author's organization).
    OrganizationId,
    AssigneeId,
    AuthorRole,
}

/// Any record subject to visibility scoping.
///
/// A field a record does not carry never matches.
pub trait ScopedResource {
    fn organization_id(&self) -> OrganizationId;

    fn assignee_id(&self) -> Option<UserId> {
        None
    }

    fn author_role(&self) -> Option<Role> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    OrganizationIn(BTreeSet<OrganizationId>),
    AssigneeIs(UserId),
    AuthorRoleIn(BTreeSet<Role>),
    /// Conjunction; empty means "everything".
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn all() -> Self {
        Predicate::And(Vec::new())
    }

    /// Conjoin, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut parts = match self {
            Predicate::And(parts) => parts,
            p => vec![p],
        };
        match other {
            Predicate::And(more) => parts.extend(more),
            p => parts.push(p),
        }
        Predicate::And(parts)
    }

    pub fn matches<R: ScopedResource + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::OrganizationIn(ids) => ids.contains(&record.organization_id()),
            Predicate::AssigneeIs(user) => record.assignee_id() == Some(*user),
            Predicate::AuthorRoleIn(roles) => record
                .author_role()
                .is_some_and(|role| roles.contains(&role)),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(record)),
        }
    }

    /// Fields this predicate reads.
    pub fn fields(&self) -> BTreeSet<Field> {
        let mut out = BTreeSet::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut BTreeSet<Field>) {
        match self {
            Predicate::OrganizationIn(_) => {
                out.insert(Field::OrganizationId);
            }
            Predicate::AssigneeIs(_) => {
                out.insert(Field::AssigneeId);
            }
            Predicate::AuthorRoleIn(_) => {
                out.insert(Field::AuthorRole);
            }
            Predicate::And(parts) => parts.iter().for_each(|p| p.collect_fields(out)),
        }
    }

    /// Render as a parameterised Postgres boolean expression.
    ///
    /// Placeholders are numbered from `first_param` (`$1`, `$2`, ...), so the
    /// fragment can be spliced in front of caller filters.
    pub fn to_sql(&self, columns: &Columns, first_param: usize) -> SqlFilter {
        let mut params = Vec::new();
        let clause = self.render(columns, first_param, &mut params);
        SqlFilter { clause, params }
    }

    fn render(&self, columns: &Columns, first_param: usize, params: &mut Vec<SqlParam>) -> String {
        match self {
            Predicate::OrganizationIn(ids) if ids.is_empty() => "FALSE".to_string(),
            Predicate::OrganizationIn(ids) => {
                let slots: Vec<String> = ids
                    .iter()
                    .map(|id| bind(params, first_param, SqlParam::Uuid(*id.as_uuid())))
                    .collect();
                format!("{} IN ({})", columns.column(Field::OrganizationId), slots.join(", "))
            }
            Predicate::AssigneeIs(user) => {
                let slot = bind(params, first_param, SqlParam::Uuid(*user.as_uuid()));
                format!("{} = {}", columns.column(Field::AssigneeId), slot)
            }
            Predicate::AuthorRoleIn(roles) if roles.is_empty() => "FALSE".to_string(),
            Predicate::AuthorRoleIn(roles) => {
                let slots: Vec<String> = roles
                    .iter()
                    .map(|r| bind(params, first_param, SqlParam::Text(r.as_str().to_string())))
                    .collect();
                format!("{} IN ({})", columns.column(Field::AuthorRole), slots.join(", "))
            }
            Predicate::And(parts) if parts.is_empty() => "TRUE".to_string(),
            Predicate::And(parts) => {
                let rendered: Vec<String> = parts
                    .iter()
                    .map(|p| p.render(columns, first_param, params))
                    .collect();
                format!("({})", rendered.join(" AND "))
            }
        }
    }
}

fn bind(params: &mut Vec<SqlParam>, first_param: usize, value: SqlParam) -> String {
    params.push(value);
    format!("${}", first_param + params.len() - 1)
}

/// Column names used when rendering a predicate to SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub organization_id: &'static str,
    pub assignee_id: &'static str,
    pub author_role: &'static str,
}

impl Columns {
    pub const TASKS: Columns = Columns {
        organization_id: "task.organization_id",
        assignee_id: "task.assignee_id",
        author_role: "NULL",
    };

    pub const AUDIT: Columns = Columns {
        organization_id: "author.organization_id",
        assignee_id: "NULL",
        author_role: "author.role",
    };

    pub fn column(&self, field: Field) -> &'static str {
        match field {
            Field::OrganizationId => self.organization_id,
            Field::AssigneeId => self.assignee_id,
            Field::AuthorRole => self.author_role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
}

/// Rendered `WHERE` fragment plus its bind parameters, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec {
        org: OrganizationId,
        assignee: Option<UserId>,
        role: Option<Role>,
    }

    impl ScopedResource for Rec {
        fn organization_id(&self) -> OrganizationId {
            self.org
        }
        fn assignee_id(&self) -> Option<UserId> {
            self.assignee
        }
        fn author_role(&self) -> Option<Role> {
            self.role
        }
    }

    #[test]
    fn and_flattens() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let p = Predicate::OrganizationIn(BTreeSet::from([org]))
            .and(Predicate::all())
            .and(Predicate::AssigneeIs(user));
        assert_eq!(
            p,
            Predicate::And(vec![
                Predicate::OrganizationIn(BTreeSet::from([org])),
                Predicate::AssigneeIs(user),
            ])
        );
    }

    #[test]
    fn missing_fields_never_match() {
        let org = OrganizationId::new();
        let rec = Rec { org, assignee: None, role: None };
        assert!(!Predicate::AssigneeIs(UserId::new()).matches(&rec));
        assert!(!Predicate::AuthorRoleIn(BTreeSet::from([Role::Viewer])).matches(&rec));
        assert!(Predicate::all().matches(&rec));
    }

    #[test]
    fn conjunction_requires_every_part() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let rec = Rec { org, assignee: Some(user), role: Some(Role::Admin) };
        let p = Predicate::OrganizationIn(BTreeSet::from([org])).and(Predicate::AssigneeIs(user));
        assert!(p.matches(&rec));
        let other = Predicate::OrganizationIn(BTreeSet::from([org])).and(Predicate::AssigneeIs(UserId::new()));
        assert!(!other.matches(&rec));
        assert_eq!(p.fields(), BTreeSet::from([Field::OrganizationId, Field::AssigneeId]));
    }

    #[test]
    fn renders_sql_with_numbered_params() {
        let org = OrganizationId::new();
        let user = UserId::new();
        let p = Predicate::OrganizationIn(BTreeSet::from([org])).and(Predicate::AssigneeIs(user));
        let sql = p.to_sql(&Columns::TASKS, 3);
        assert_eq!(sql.clause, "(task.organization_id IN ($3) AND task.assignee_id = $4)");
        assert_eq!(
            sql.params,
            vec![SqlParam::Uuid(*org.as_uuid()), SqlParam::Uuid(*user.as_uuid())]
        );
    }

    #[test]
    fn renders_audit_role_filter() {
        let org = OrganizationId::new();
        let p = Predicate::OrganizationIn(BTreeSet::from([org]))
            .and(Predicate::AuthorRoleIn(BTreeSet::from([Role::Viewer, Role::Admin])));
        let sql = p.to_sql(&Columns::AUDIT, 1);
        assert_eq!(
            sql.clause,
            "(author.organization_id IN ($1) AND author.role IN ($2, $3))"
        );
        assert_eq!(sql.params[1], SqlParam::Text("viewer".into()));
        assert_eq!(sql.params[2], SqlParam::Text("admin".into()));
    }

    #[test]
    fn empty_membership_renders_false() {
        let sql = Predicate::OrganizationIn(BTreeSet::new()).to_sql(&Columns::TASKS, 1);
        assert_eq!(sql.clause, "FALSE");
        assert!(sql.params.is_empty());
        assert_eq!(Predicate::all().to_sql(&Columns::TASKS, 1).clause, "TRUE");
    }
}
