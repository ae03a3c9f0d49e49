//! JSON HTTP API for dodo
//!
//! Every todo route is scoped to the caller named by the `X-User-Id`
//! request header.

pub mod error;
pub mod handlers;

use crate::error::{CliError, CliResult};
use actix_web::dev::Payload;
use actix_web::middleware::Logger;
use actix_web::{App, FromRequest, HttpRequest, HttpServer, web};
use dodo_db::{CoverStore, Database};
use error::ApiError;
use std::future::{Ready, ready};
use std::sync::Arc;
use tracing::info;

/// Header carrying the caller identity
pub const USER_HEADER: &str = "X-User-Id";

/// Largest request body accepted for cover uploads
///
/// Kept above the cover size limit so oversized images get a
/// validation error instead of a bare 413.
pub const COVER_PAYLOAD_LIMIT: usize = 4 * 1024 * 1024;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: Arc<dyn CoverStore>,
}

impl AppState {
    /// Create the shared state
    pub fn new(db: Database, store: Arc<dyn CoverStore>) -> Self {
        Self { db, store }
    }
}

/// Caller identity taken from the `X-User-Id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| CurrentUser(value.to_string()));

        ready(user.ok_or(ApiError::MissingUser))
    }
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(COVER_PAYLOAD_LIMIT))
        .service(handlers::healthcheck)
        .service(handlers::index)
        .service(handlers::create_todo)
        .service(handlers::update_todo)
        .service(handlers::delete_todo)
        .service(handlers::upload_cover)
        .service(handlers::get_cover)
        .default_service(web::route().to(handlers::not_found));
}

/// Run the HTTP server until it is stopped.
///
/// # Errors
///
/// Returns `CliError::Server` if the address cannot be bound or the
/// server fails while running.
pub async fn run(state: AppState, bind: &str) -> CliResult<()> {
    let data = web::Data::new(state);
    let server_error = |source| CliError::Server {
        addr: bind.to_string(),
        source,
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(configure)
            .wrap(Logger::default())
    })
    .bind(bind)
    .map_err(server_error)?;

    info!("Listening on {}", bind);
    server.run().await.map_err(server_error)
}
