//! Update command for modifying existing todos
//!
//! Implements the `dodo update` command to change the title and
//! description of a todo. Completion is handled by `done`/`undone`.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;
use dodo_db::{Todo, TodoUpdate};

/// Update an existing todo
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Todo ID to update (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
}

impl UpdateCommand {
    /// Execute the update command.
    ///
    /// Options that are not given leave the matching field unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Db` if the todo is missing or not owned by the
    /// caller, or if the new title is invalid.
    pub async fn execute(&self, ctx: &Context) -> CliResult<Todo> {
        let user = ctx.user()?;
        let id = self.id.to_lowercase();
        Ok(ctx.db.todos().update(user, &id, &self.build_update()).await?)
    }

    /// Build a TodoUpdate from the command options.
    fn build_update(&self) -> TodoUpdate {
        let mut update = TodoUpdate::new();

        if let Some(title) = &self.title {
            update = update.with_title(title.clone());
        }

        if self.clear_description {
            update = update.clear_description();
        } else if let Some(description) = &self.description {
            update = update.with_description(description.clone());
        }

        update
    }
}
