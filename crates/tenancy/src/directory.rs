use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use tasktrack_core::OrganizationId;

use crate::Organization;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("organization directory unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the organization graph.
///
/// Implementations must answer concurrent identical lookups independently;
/// the graph is not mutated by request traffic.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// `Ok(None)` means the organization does not exist.
    async fn get_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, DirectoryError>;
}

#[async_trait]
impl<D> OrganizationDirectory for Arc<D>
where
    D: OrganizationDirectory + ?Sized,
{
    async fn get_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Option<Organization>, DirectoryError> {
        (**self).get_organization(id).await
    }
}
