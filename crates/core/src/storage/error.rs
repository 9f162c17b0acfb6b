use thiserror::Error;
use uuid::Uuid;

use crate::context::Namespace;

/// Errors that can occur during repository operations.
///
/// Decorators return these unchanged from the repository they wrap.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found: {id} (namespace: {namespace})")]
    NotFound { namespace: Namespace, id: Uuid },
    #[error("Entity factory not set")]
    MissingEntityFactory,
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Returns true if this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
