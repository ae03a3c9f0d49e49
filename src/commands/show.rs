//! Show command for displaying full todo details
//!
//! Implements the `dodo show` command.

use crate::commands::Context;
use crate::error::CliResult;
use crate::output;
use clap::Args;

/// Show full details of a todo
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Todo ID to show (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

impl ShowCommand {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Db` if the todo does not exist or belongs to
    /// another user.
    pub async fn execute(&self, ctx: &Context) -> CliResult<String> {
        let user = ctx.user()?;
        let id = self.id.to_lowercase();

        let todo = ctx.db.todos().find_owned(user, &id).await?;

        let cover_location = match &todo.cover {
            Some(path) => Some(ctx.store.full_path(path)?.display().to_string()),
            None => None,
        };

        Ok(output::format_todo_detail(&todo, cover_location.as_deref()))
    }
}
