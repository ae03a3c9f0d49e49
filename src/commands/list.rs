//! List command for displaying todos
//!
//! Implements the `dodo list` command: search, status filter and
//! pagination over the caller's todos.

use crate::commands::Context;
use crate::error::CliResult;
use clap::Args;
use dodo_db::{DEFAULT_PER_PAGE, PagedResult, StatusFilter, Todo, TodoQuery};

/// List todos with optional search and filter
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Text to find in the title or description (case-insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Completion status (all, finished, unfinished)
    #[arg(short, long, value_parser = parse_filter)]
    pub filter: Option<StatusFilter>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u64,

    /// Todos per page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u64,
}

/// Parse a filter string into a StatusFilter
fn parse_filter(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "invalid filter '{}'. Valid values: all, finished, unfinished",
            s
        )
    })
}

impl ListCommand {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingUser` without a caller identity.
    /// Returns `CliError::Db` if the query fails.
    pub async fn execute(&self, ctx: &Context) -> CliResult<PagedResult<Todo>> {
        let query = self.build_query(ctx.user()?);
        Ok(ctx.db.lister().list(&query).await?)
    }

    /// Build a TodoQuery from the command options.
    fn build_query(&self, user: &str) -> TodoQuery {
        let mut query = TodoQuery::for_user(user)
            .with_page(self.page)
            .with_per_page(self.per_page);

        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }

        if let Some(filter) = self.filter {
            query = query.with_filter(filter);
        }

        query
    }
}
