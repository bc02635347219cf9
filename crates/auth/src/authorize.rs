//! Enforcement guard: the coarse allow/deny check made before any action.
//!
//! - No IO
//! - No panics
//! - Same inputs, same decision

use std::sync::Arc;

use serde::Serialize;

use crate::{
    AccessPolicy, AuthorizationExplanation, AuthzError, OperationId, OperationTable, Permission,
    Principal, Requirements, Role, explain_authorization,
};

/// Outcome of a guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert into a `Result` for `?`-style propagation.
    pub fn into_result(self) -> Result<(), AuthzError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AuthzError::Unauthenticated),
            Decision::Deny(reason) => Err(AuthzError::Forbidden(reason.to_string())),
        }
    }
}

/// Why a request was denied. Intended for logs, not end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenyReason {
    /// No authenticated caller.
    Unauthenticated,
    /// The caller's role is below every accepted role.
    InsufficientRole { role: Role, required_any: Vec<Role> },
    /// The caller's role lacks at least one required permission.
    MissingPermissions { role: Role, missing: Vec<Permission> },
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DenyReason::Unauthenticated => f.write_str("no authenticated principal"),
            DenyReason::InsufficientRole { role, required_any } => {
                write!(f, "insufficient role '{role}', required one of: {}", join(required_any))
            }
            DenyReason::MissingPermissions { role, missing } => {
                write!(f, "role '{role}' is missing permissions: {}", join(missing))
            }
        }
    }
}

fn join<T: core::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decide whether `principal` satisfies `requirements` under `policy`.
///
/// - no principal → deny, whatever the requirements;
/// - roles (if any) are a disjunction: at least one must be met via the hierarchy;
/// - permissions (if any) are a conjunction: every one must be held;
/// - both present → both checks must pass.
pub fn decide(
    policy: &AccessPolicy,
    principal: Option<&Principal>,
    requirements: &Requirements,
) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    if !requirements.roles.is_empty()
        && !requirements
            .roles
            .iter()
            .any(|r| policy.is_at_least(principal.role, *r))
    {
        return Decision::Deny(DenyReason::InsufficientRole {
            role: principal.role,
            required_any: requirements.roles.clone(),
        });
    }

    let missing: Vec<Permission> = requirements
        .permissions
        .iter()
        .copied()
        .filter(|p| !policy.has_permission(principal.role, *p))
        .collect();
    if !missing.is_empty() {
        return Decision::Deny(DenyReason::MissingPermissions {
            role: principal.role,
            missing,
        });
    }

    Decision::Allow
}

/// Table-driven guard shared by every service.
#[derive(Debug, Clone)]
pub struct Guard {
    policy: Arc<AccessPolicy>,
    operations: Arc<OperationTable>,
}

impl Guard {
    pub fn new(policy: Arc<AccessPolicy>, operations: Arc<OperationTable>) -> Self {
        Self { policy, operations }
    }

    pub fn standard() -> Self {
        Self::new(
            Arc::new(AccessPolicy::standard()),
            Arc::new(OperationTable::standard()),
        )
    }

    pub fn policy(&self) -> &Arc<AccessPolicy> {
        &self.policy
    }

    pub fn operations(&self) -> &OperationTable {
        &self.operations
    }

    /// Decide against explicit requirements.
    pub fn decide(&self, principal: Option<&Principal>, requirements: &Requirements) -> Decision {
        decide(&self.policy, principal, requirements)
    }

    /// Decide for a declared operation.
    ///
    /// Fails with a configuration error if the operation is not in the table.
    pub fn decide_operation(
        &self,
        principal: Option<&Principal>,
        operation: &OperationId,
    ) -> Result<Decision, AuthzError> {
        let requirements = self.operations.requirements(operation)?;
        let decision = self.decide(principal, requirements);
        match &decision {
            Decision::Allow => tracing::debug!(
                operation = %operation,
                principal = ?principal.map(|p| p.id),
                "access granted"
            ),
            Decision::Deny(reason) => {
                let explanation = explain_authorization(&self.policy, principal, requirements);
                tracing::info!(
                    operation = %operation,
                    principal = ?principal.map(|p| p.id),
                    reason = %reason,
                    explanation = %serde_json::to_string(&explanation).unwrap_or_default(),
                    "access denied"
                );
            }
        }
        Ok(decision)
    }

    /// Operator-facing explanation of the decision for a declared operation.
    pub fn explain_operation(
        &self,
        principal: Option<&Principal>,
        operation: &OperationId,
    ) -> Result<AuthorizationExplanation, AuthzError> {
        let requirements = self.operations.requirements(operation)?;
        Ok(explain_authorization(&self.policy, principal, requirements))
    }

    /// Like [`Guard::decide_operation`] but folds the decision into a `Result`.
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        operation: &OperationId,
    ) -> Result<(), AuthzError> {
        self.decide_operation(principal, operation)?.into_result()
    }
}
