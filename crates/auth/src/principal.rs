use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tasktrack_core::{OrganizationId, UserId};

use crate::{JwtClaims, Role, TokenValidationError, validate_claims};

/// The authenticated caller of a request.
///
/// Built once per request from verified claims and never mutated afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub organization_id: OrganizationId,
}

impl Principal {
    pub fn new(id: UserId, role: Role, organization_id: OrganizationId) -> Self {
        Self {
            id,
            role,
            organization_id,
        }
    }

    /// Derive the request principal from already-verified token claims.
    pub fn from_claims(
        claims: &JwtClaims,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenValidationError> {
        validate_claims(claims, now)?;
        Ok(Self::new(claims.sub, claims.role, claims.organization_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn from_claims_copies_identity() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            role: Role::Admin,
            organization_id: OrganizationId::new(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        };
        let principal = Principal::from_claims(&claims, now).unwrap();
        assert_eq!(principal.id, claims.sub);
        assert_eq!(principal.role, Role::Admin);
        assert_eq!(principal.organization_id, claims.organization_id);
    }

    #[test]
    fn from_claims_rejects_expired_tokens() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            role: Role::Viewer,
            organization_id: OrganizationId::new(),
            issued_at: now - Duration::minutes(20),
            expires_at: now - Duration::minutes(10),
        };
        assert_eq!(
            Principal::from_claims(&claims, now),
            Err(TokenValidationError::Expired)
        );
    }
}
