//! CLI-level errors (wraps application errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Bad data (rejected moves, malformed snapshots, unknown languages)
    /// maps to DATAERR; a missing input file to NOINPUT; anything else
    /// I/O-shaped to IOERR.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::App(app) => match app {
                ApplicationError::Hierarchy(_)
                | ApplicationError::Merge(_)
                | ApplicationError::Snapshot { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { source, .. } => {
                    if source.kind() == ErrorKind::NotFound {
                        crate::exitcode::NOINPUT
                    } else {
                        crate::exitcode::IOERR
                    }
                }
            },
        }
    }
}
