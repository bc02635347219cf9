// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

use serde::Serialize;

use tasktrack_core::{OrganizationId, UserId};

use crate::{AccessPolicy, Decision, DenyReason, Permission, Principal, Requirements, Role, decide};

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this request allowed/denied?" for operators.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_roles: Vec<Role>,
    pub required_permissions: Vec<Permission>,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Details about the principal's state, when one was present.
    pub principal: Option<PrincipalState>,

    /// If denied, this explains what was missing.
    pub denial: Option<DenialDetail>,
}

/// Current state of the principal being checked.
#[derive(Debug, Clone, Serialize)]
pub struct PrincipalState {
    pub principal_id: UserId,
    pub organization_id: OrganizationId,
    pub role: Role,
    pub level: u32,
    pub effective_permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialDetail {
    pub reason: DenyReason,
    pub suggestions: Vec<String>,
}

/// Explain the decision [`decide`] would make for these inputs.
pub fn explain_authorization(
    policy: &AccessPolicy,
    principal: Option<&Principal>,
    requirements: &Requirements,
) -> AuthorizationExplanation {
    let decision = decide(policy, principal, requirements);

    let state = principal.map(|p| PrincipalState {
        principal_id: p.id,
        organization_id: p.organization_id,
        role: p.role,
        level: policy.level(p.role),
        effective_permissions: policy.permissions_of(p.role).iter().copied().collect(),
    });

    let (granted, reason, denial) = match decision {
        Decision::Allow => {
            let reason = match principal {
                Some(p) if requirements.is_unrestricted() => {
                    format!("No requirements declared; principal {} allowed", p.id)
                }
                Some(p) => format!(
                    "Role '{}' (level {}) satisfies every requirement",
                    p.role,
                    policy.level(p.role)
                ),
                None => "Allowed".to_string(),
            };
            (true, reason, None)
        }
        Decision::Deny(reason) => {
            let suggestions = suggestions_for(policy, &reason);
            (
                false,
                reason.to_string(),
                Some(DenialDetail {
                    reason,
                    suggestions,
                }),
            )
        }
    };

    AuthorizationExplanation {
        required_roles: requirements.roles.clone(),
        required_permissions: requirements.permissions.clone(),
        granted,
        reason,
        principal: state,
        denial,
    }
}

fn suggestions_for(policy: &AccessPolicy, reason: &DenyReason) -> Vec<String> {
    match reason {
        DenyReason::Unauthenticated => vec![
            "Verify the request carries a valid, unexpired token".to_string(),
        ],
        DenyReason::InsufficientRole { required_any, .. } => {
            let lowest = required_any.iter().min_by_key(|r| policy.level(**r));
            match lowest {
                Some(role) => vec![format!("Assign role '{role}' or higher")],
                None => Vec::new(),
            }
        }
        DenyReason::MissingPermissions { missing, .. } => {
            // Lowest role that would grant everything that is missing.
            let granting = policy.hierarchy().ascending().into_iter().find(|role| {
                missing.iter().all(|p| policy.has_permission(*role, *p))
            });
            let mut out = Vec::new();
            if let Some(role) = granting {
                out.push(format!(
                    "Role '{role}' grants the missing permissions"
                ));
            }
            out.push(format!(
                "Adjust the policy so the caller's role grants: {}",
                missing
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explains_missing_permission_with_granting_role() {
        let policy = AccessPolicy::standard();
        let viewer = Principal::new(UserId::new(), Role::Viewer, OrganizationId::new());
        let req = Requirements::permissions([Permission::AuditRead]);

        let exp = explain_authorization(&policy, Some(&viewer), &req);
        assert!(!exp.granted);
        let denial = exp.denial.unwrap();
        assert!(denial.suggestions[0].contains("admin"));
        assert_eq!(exp.principal.unwrap().effective_permissions, vec![Permission::TaskRead]);
    }

    #[test]
    fn explains_grant() {
        let policy = AccessPolicy::standard();
        let owner = Principal::new(UserId::new(), Role::Owner, OrganizationId::new());
        let req = Requirements::roles([Role::Admin]);

        let exp = explain_authorization(&policy, Some(&owner), &req);
        assert!(exp.granted);
        assert!(exp.denial.is_none());
        assert!(exp.reason.contains("level 3"));
    }

    #[test]
    fn serializes_denial_kind() {
        let policy = AccessPolicy::standard();
        let exp = explain_authorization(&policy, None, &Requirements::none());
        let json = serde_json::to_value(&exp).unwrap();
        assert_eq!(json["granted"], false);
        assert_eq!(json["denial"]["reason"]["kind"], "unauthenticated");
        assert!(json["principal"].is_null());
    }
}
