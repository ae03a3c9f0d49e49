//! Stats command for the completion summary
//!
//! Implements the `dodo stats` command.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;
use dodo_db::TodoStats;

/// Show finished/unfinished counts for the caller's todos
#[derive(Debug, Args)]
pub struct StatsCommand {}

impl StatsCommand {
    /// Execute the stats command.
    pub async fn execute(&self, ctx: &Context) -> CliResult<TodoStats> {
        let user = ctx.user()?;
        Ok(ctx.db.lister().stats(user).await?)
    }
}
