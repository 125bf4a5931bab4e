//! Application-level errors (wraps domain and store errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::StoreError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("no variables selected")]
    EmptySelection,

    #[error("no collection selected")]
    NoCollectionSelected,

    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Why a single variable could not be moved.
///
/// Batches keep one of these per failed item, so it is cheap to clone and
/// compare.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("incompatible modes: {0}")]
    IncompatibleModes(String),

    #[error("a variable named '{0}' already exists in the target collection")]
    DuplicateName(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    /// A failed move whose cleanup failed too; both variables now exist.
    #[error("store left inconsistent: original {original_id} and copy {copy_id} both exist ({detail})")]
    Inconsistent {
        original_id: String,
        copy_id: String,
        detail: String,
    },
}
