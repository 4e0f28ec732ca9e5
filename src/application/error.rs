//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{HierarchyError, MergeError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("{0}")]
    Merge(#[from] MergeError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid snapshot: {message}")]
    Snapshot { message: String },

    #[error("operation failed: {context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
