use thiserror::Error;

/// Authorization failure taxonomy.
///
/// `Unauthenticated` and `Forbidden` are request outcomes. `Configuration` is a
/// deployment defect (unknown role/permission, invalid policy table) and must
/// abort the decision rather than fall back to a default.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated: no principal present")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthzError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
