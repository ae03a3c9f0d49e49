//! CLI commands for dodo
//!
//! This module contains all subcommand implementations for the dodo CLI.

pub mod add;
pub mod cover;
pub mod delete;
pub mod done;
pub mod list;
pub mod serve;
pub mod show;
pub mod stats;
pub mod update;

pub use add::AddCommand;
pub use cover::CoverCommand;
pub use delete::DeleteCommand;
pub use done::{DoneCommand, UndoneCommand};
pub use list::ListCommand;
pub use serve::ServeCommand;
pub use show::ShowCommand;
pub use stats::StatsCommand;
pub use update::UpdateCommand;

use crate::error::{CliError, CliResult};
use crate::output;
use clap::Subcommand;
use dodo_db::{Database, LocalCoverStore};

/// Everything a command needs to run
#[derive(Clone)]
pub struct Context {
    /// Open, initialized database
    pub db: Database,
    /// Cover file storage
    pub store: LocalCoverStore,
    /// Caller identity, if one was given
    pub user: Option<String>,
}

impl Context {
    /// Create a command context
    pub fn new(db: Database, store: LocalCoverStore, user: Option<String>) -> Self {
        Self { db, store, user }
    }

    /// The caller identity, required by every user-scoped command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingUser` if no non-blank user was given.
    pub fn user(&self) -> CliResult<&str> {
        self.user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(CliError::MissingUser)
    }
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new todo
    Add(AddCommand),
    /// List todos with search, filter and pagination
    List(ListCommand),
    /// Show full details of a todo
    Show(ShowCommand),
    /// Change the title or description of a todo
    Update(UpdateCommand),
    /// Mark a todo as finished
    Done(DoneCommand),
    /// Mark a todo as unfinished
    Undone(UndoneCommand),
    /// Delete a todo and its cover
    Delete(DeleteCommand),
    /// Set or show the cover image of a todo
    Cover(CoverCommand),
    /// Show finished/unfinished counts
    Stats(StatsCommand),
    /// Run the JSON HTTP API
    Serve(ServeCommand),
}

impl Command {
    /// Execute the command and render its output.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the command execution fails.
    pub async fn execute(&self, ctx: &Context) -> CliResult<String> {
        match self {
            Command::Add(cmd) => {
                let todo = cmd.execute(ctx).await?;
                Ok(format!("Created todo: {}", todo.id))
            }
            Command::List(cmd) => {
                let page = cmd.execute(ctx).await?;
                Ok(output::format_page(&page))
            }
            Command::Show(cmd) => cmd.execute(ctx).await,
            Command::Update(cmd) => {
                let todo = cmd.execute(ctx).await?;
                Ok(format!("Updated todo: {}", todo.id))
            }
            Command::Done(cmd) => {
                let todo = cmd.execute(ctx).await?;
                Ok(format!("Finished todo: {}", todo.id))
            }
            Command::Undone(cmd) => {
                let todo = cmd.execute(ctx).await?;
                Ok(format!("Reopened todo: {}", todo.id))
            }
            Command::Delete(cmd) => {
                cmd.execute(ctx).await?;
                Ok(format!("Deleted todo: {}", cmd.id))
            }
            Command::Cover(cmd) => cmd.execute(ctx).await,
            Command::Stats(cmd) => {
                let stats = cmd.execute(ctx).await?;
                Ok(output::format_stats(&stats))
            }
            Command::Serve(cmd) => {
                cmd.execute(ctx).await?;
                Ok("Server stopped".to_string())
            }
        }
    }
}
