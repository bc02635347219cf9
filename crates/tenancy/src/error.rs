use thiserror::Error;

use crate::DirectoryError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
