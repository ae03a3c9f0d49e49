//! Done/undone commands for toggling completion
//!
//! Implements `dodo done` and `dodo undone`.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;
use dodo_db::{Todo, TodoUpdate};

/// Mark a todo as finished
#[derive(Debug, Args)]
pub struct DoneCommand {
    /// Todo ID to finish (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

/// Mark a todo as unfinished
#[derive(Debug, Args)]
pub struct UndoneCommand {
    /// Todo ID to reopen (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

/// Set the completion flag of a todo owned by the caller
async fn set_finished(ctx: &Context, id: &str, finished: bool) -> CliResult<Todo> {
    let user = ctx.user()?;
    let update = TodoUpdate::new().with_finished(finished);
    Ok(ctx
        .db
        .todos()
        .update(user, &id.to_lowercase(), &update)
        .await?)
}

impl DoneCommand {
    /// Execute the done command. Finishing a finished todo is a no-op.
    pub async fn execute(&self, ctx: &Context) -> CliResult<Todo> {
        set_finished(ctx, &self.id, true).await
    }
}

impl UndoneCommand {
    /// Execute the undone command.
    pub async fn execute(&self, ctx: &Context) -> CliResult<Todo> {
        set_finished(ctx, &self.id, false).await
    }
}
