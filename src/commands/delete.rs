//! Delete command for removing todos
//!
//! Implements the `dodo delete` command. The todo's cover file is
//! released along with the record.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;

/// Delete a todo
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Todo ID to delete (case-insensitive)
    #[arg(required = true)]
    pub id: String,
}

impl DeleteCommand {
    /// Execute the delete command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Db` if the todo is missing, owned by another
    /// user, or its cover file cannot be removed.
    pub async fn execute(&self, ctx: &Context) -> CliResult<()> {
        let user = ctx.user()?;
        let id = self.id.to_lowercase();
        ctx.db.todos().delete(user, &id, &ctx.store).await?;
        Ok(())
    }
}
