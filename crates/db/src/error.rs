use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A validation message attached to a single input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Input field name (title, description, cover, ...)
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Database error types for dodo
#[derive(Error, Debug)]
pub enum DbError {
    /// Error establishing connection to the database
    #[error("Failed to connect to database at {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: Box<surrealdb::Error>,
    },

    /// Error during schema initialization
    #[error("Failed to initialize database schema: {0}")]
    Schema(#[source] Box<surrealdb::Error>),

    /// Error executing a query
    #[error("Query execution failed")]
    Query(#[source] Box<surrealdb::Error>),

    /// Error with a database or storage path (invalid or inaccessible)
    #[error("Invalid path: {path} - {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Error when a requested todo was not found
    #[error("Todo '{todo_id}' not found")]
    NotFound { todo_id: String },

    /// Error when the caller does not own the targeted todo
    #[error("Not allowed to modify todo '{todo_id}'")]
    Unauthorized { todo_id: String },

    /// Error creating a data directory
    #[error("Failed to create directory at {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input failed one or more field rules
    #[error("{}", summarize(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Error reading or writing a stored cover file
    #[error("Storage operation failed at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A storage task on the blocking pool panicked or was cancelled
    #[error("Storage task did not complete: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    /// No free id could be generated for a new todo
    #[error("Failed to generate a unique todo id after {attempts} attempts")]
    IdExhausted { attempts: usize },

    /// Error encoding pagination link parameters
    #[error("Failed to encode page link: {0}")]
    LinkEncoding(#[from] serde_urlencoded::ser::Error),
}

/// First message, plus a count of the rest
fn summarize(errors: &[FieldError]) -> String {
    match errors {
        [] => "The given data was invalid.".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!(
            "{} (and {} more error{})",
            first.message,
            rest.len(),
            if rest.len() == 1 { "" } else { "s" }
        ),
    }
}

impl From<surrealdb::Error> for DbError {
    fn from(err: surrealdb::Error) -> Self {
        DbError::Query(Box::new(err))
    }
}

impl DbError {
    /// Build a validation error for a single field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DbError::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Get the full error message including nested SurrealDB error details.
    ///
    /// This is useful for displaying detailed error information to users.
    pub fn full_message(&self) -> String {
        match self {
            DbError::Query(err) => format!("Query execution failed: {}", err),
            DbError::Validation { errors } if errors.len() > 1 => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;
