use dodo_db::DbError;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for the dodo binary
#[derive(Error, Debug)]
pub enum CliError {
    /// Error from the database layer
    #[error(transparent)]
    Db(#[from] DbError),

    /// No caller identity was supplied for a user-scoped command
    #[error("No user given. Pass --user or set DODO_USER")]
    MissingUser,

    /// Error reading a local file given on the command line
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a local file given on the command line
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error binding or running the HTTP server
    #[error("Server error on {addr}: {source}")]
    Server {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Full message including nested database error details.
    pub fn full_message(&self) -> String {
        match self {
            CliError::Db(err) => err.full_message(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;
