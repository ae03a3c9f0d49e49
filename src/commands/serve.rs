//! Serve command for the JSON HTTP API
//!
//! Implements `dodo serve`, which runs the API over the same database
//! and cover storage the other commands use.

use crate::commands::Context;
use crate::error::CliResult;
use crate::server::{self, AppState};
use clap::Args;
use std::sync::Arc;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Run the JSON HTTP API
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on
    #[arg(long, env = "DODO_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,
}

impl ServeCommand {
    /// Execute the serve command. Runs until the server is stopped.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Server` if the address cannot be bound.
    pub async fn execute(&self, ctx: &Context) -> CliResult<()> {
        let state = AppState::new(ctx.db.clone(), Arc::new(ctx.store.clone()));
        server::run(state, &self.bind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_env;
    use crate::error::CliError;
    use std::net::TcpListener;

    #[tokio::test]
    async fn test_serve_reports_bind_failure() {
        let env = test_env("alice").await;
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let err = ServeCommand { bind: addr.clone() }
            .execute(&env.ctx)
            .await
            .unwrap_err();
        match err {
            CliError::Server { addr: failed, .. } => assert_eq!(failed, addr),
            other => panic!("Expected Server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serve_rejects_invalid_address() {
        let env = test_env("alice").await;
        let err = ServeCommand {
            bind: "not an address".to_string(),
        }
        .execute(&env.ctx)
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Server { .. }));
    }
}
