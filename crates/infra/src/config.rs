//! Engine configuration, read from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `TASKTRACK_POLICY_PATH` | built-in standard policy |
//! | `TASKTRACK_AUDIT_PAGE_SIZE` | 20 |

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use tasktrack_auth::{AccessPolicy, AuthzError, OperationTable, PolicyDocument};
use tasktrack_tenancy::PageRequest;

pub const POLICY_PATH_VAR: &str = "TASKTRACK_POLICY_PATH";
pub const AUDIT_PAGE_SIZE_VAR: &str = "TASKTRACK_AUDIT_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Policy(#[from] AuthzError),

    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub policy: Arc<AccessPolicy>,
    pub operations: Arc<OperationTable>,
    pub audit_page_size: u32,
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            policy: Arc::new(AccessPolicy::standard()),
            operations: Arc::new(OperationTable::standard()),
            audit_page_size: PageRequest::DEFAULT_LIMIT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (policy, operations) = match lookup(POLICY_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let built = PolicyDocument::from_json(&raw)?.build()?;
                tracing::info!(path = %path.display(), "loaded access policy");
                built
            }
            None => {
                tracing::warn!("{POLICY_PATH_VAR} not set; using built-in standard policy");
                (AccessPolicy::standard(), OperationTable::standard())
            }
        };

        let audit_page_size = match lookup(AUDIT_PAGE_SIZE_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=PageRequest::MAX_LIMIT).contains(n))
                .ok_or(ConfigError::InvalidValue {
                    var: AUDIT_PAGE_SIZE_VAR,
                    value: raw,
                })?,
            None => PageRequest::DEFAULT_LIMIT,
        };

        Ok(Self {
            policy: Arc::new(policy),
            operations: Arc::new(operations),
            audit_page_size,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(*cfg.policy, AccessPolicy::standard());
        assert_eq!(*cfg.operations, OperationTable::standard());
        assert_eq!(cfg.audit_page_size, 20);
    }

    #[test]
    fn page_size_is_validated() {
        let cfg = EngineConfig::from_lookup(lookup(&[(AUDIT_PAGE_SIZE_VAR, "50")])).unwrap();
        assert_eq!(cfg.audit_page_size, 50);

        for bad in ["0", "101", "ten"] {
            let err = EngineConfig::from_lookup(lookup(&[(AUDIT_PAGE_SIZE_VAR, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{bad}");
        }
    }

    #[test]
    fn policy_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("tasktrack-policy-{}.json", uuid::Uuid::now_v7()));
        std::fs::write(
            &path,
            r#"{
                "roles": {
                    "viewer": { "level": 1, "grants": ["task:read", "task:create"] },
                    "admin":  { "level": 2, "grants": ["task:update", "task:delete", "audit:read"] },
                    "owner":  { "level": 3, "grants": ["user:manage", "org:manage"] }
                }
            }"#,
        )
        .unwrap();

        let cfg = EngineConfig::from_lookup(lookup(&[(POLICY_PATH_VAR, path.to_str().unwrap())])).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(cfg.policy.has_permission(
            tasktrack_auth::Role::Viewer,
            tasktrack_auth::Permission::TaskCreate
        ));
    }

    #[test]
    fn missing_policy_file_is_an_error() {
        let err = EngineConfig::from_lookup(lookup(&[(POLICY_PATH_VAR, "/nonexistent/policy.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
