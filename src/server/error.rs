//! HTTP error responses
//!
//! Maps database errors onto status codes and JSON bodies:
//!
//! ```text
//! 422 {"message": "...", "errors": {"title": ["The title field is required."]}}
//! 403 / 404 / 401 / 500 {"message": "..."}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use dodo_db::{DbError, FieldError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Error type returned by every handler
#[derive(Error, Debug)]
pub enum ApiError {
    /// Error from the database layer
    #[error(transparent)]
    Db(#[from] DbError),

    /// A blocking storage call could not be completed
    #[error("Blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),

    /// The request carried no caller identity
    #[error("Unauthenticated.")]
    MissingUser,

    /// The todo exists but has no cover to serve
    #[error("Todo '{todo_id}' has no cover")]
    NoCover { todo_id: String },
}

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Group field errors by field name, keeping message order
fn group_errors(errors: &[FieldError]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for e in errors {
        grouped
            .entry(e.field.clone())
            .or_default()
            .push(e.message.clone());
    }
    grouped
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Db(DbError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Db(DbError::Unauthorized { .. }) => StatusCode::FORBIDDEN,
            ApiError::Db(DbError::NotFound { .. }) | ApiError::NoCover { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::MissingUser => StatusCode::UNAUTHORIZED,
            ApiError::Db(_) | ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ApiError::Db(DbError::Validation { errors }) => ErrorBody {
                message: self.to_string(),
                errors: Some(group_errors(errors)),
            },
            ApiError::Db(DbError::Unauthorized { .. }) => ErrorBody {
                message: "This action is unauthorized.".to_string(),
                errors: None,
            },
            ApiError::Db(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                error!("Request failed: {}", err.full_message());
                ErrorBody {
                    message: "Server Error".to_string(),
                    errors: None,
                }
            }
            ApiError::Blocking(err) => {
                error!("Request failed: {}", err);
                ErrorBody {
                    message: "Server Error".to_string(),
                    errors: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                errors: None,
            },
        };
        HttpResponse::build(status).json(body)
    }
}
