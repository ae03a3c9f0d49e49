//! Add command for creating new todos
//!
//! Implements the `dodo add` command.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;
use dodo_db::{NewTodo, Todo};

/// Create a new todo
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Title of the todo
    #[arg(required = true)]
    pub title: String,

    /// Detailed description
    #[arg(short, long)]
    pub description: Option<String>,
}

impl AddCommand {
    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingUser` without a caller identity.
    /// Returns a validation error if the title is blank or too long.
    pub async fn execute(&self, ctx: &Context) -> CliResult<Todo> {
        let user = ctx.user()?;

        let mut new = NewTodo::new(self.title.clone());
        if let Some(description) = &self.description {
            new = new.with_description(description.clone());
        }

        Ok(ctx.db.todos().create(user, &new).await?)
    }
}
