//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent variable data the tree cannot hold.
/// These are independent of store concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid variable name {name:?} ({variable_id}): {reason}")]
    InvalidName {
        variable_id: String,
        name: String,
        reason: String,
    },

    #[error("duplicate variable path {path:?} ({variable_id})")]
    DuplicatePath { variable_id: String, path: String },

    #[error("variable path {path:?} ({variable_id}) conflicts with existing node {existing:?}")]
    PathConflict {
        variable_id: String,
        path: String,
        existing: String,
    },
}

impl DomainError {
    /// Id of the variable the error was raised for.
    pub fn variable_id(&self) -> &str {
        match self {
            DomainError::InvalidName { variable_id, .. }
            | DomainError::DuplicatePath { variable_id, .. }
            | DomainError::PathConflict { variable_id, .. } => variable_id.as_str(),
        }
    }
}
