//! Todo filtering and listing queries
//!
//! Provides a builder-pattern TodoQuery and a TodoLister that turns it
//! into one parameterized SurrealQL round trip: the requested page plus
//! the total count for the same predicates.

use crate::error::DbResult;
use crate::models::{StatusFilter, Todo, TodoRow, TodoStats};
use crate::repository::pagination::{PageUrl, PagedResult};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, trace};

/// Page size used when none is requested
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Base path of listing URLs when none is set
pub const DEFAULT_PATH: &str = "/";

/// Largest page number, page size or offset handed to the store
///
/// SurrealQL reads `LIMIT` and `START` as signed 64-bit integers.
pub const MAX_PAGE_BOUND: u64 = i64::MAX as u64;

/// Listing request for one user's todos
///
/// Search and status filter combine with AND semantics. The search term
/// matches a case-insensitive substring of the title or the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    /// Owner whose todos are listed
    pub user_id: String,
    /// Raw search text (trimmed before use)
    pub search: Option<String>,
    /// Status predicate, None when the request carried none
    pub filter: Option<StatusFilter>,
    /// 1-based page number
    pub page: u64,
    /// Maximum todos per page
    pub per_page: u64,
    /// Base path for page URLs
    pub path: String,
}

impl TodoQuery {
    /// Create a query for the first page of a user's todos
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            search: None,
            filter: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            path: DEFAULT_PATH.to_string(),
        }
    }

    /// Restrict to todos whose title or description contains `search`
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restrict by completion status
    pub fn with_filter(mut self, filter: StatusFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Select the page to return (0 is treated as 1)
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page.clamp(1, MAX_PAGE_BOUND);
        self
    }

    /// Override the page size (0 is treated as 1)
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.clamp(1, MAX_PAGE_BOUND);
        self
    }

    /// Base path for the generated page URLs
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Trimmed search term, None when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Parse a page parameter; missing, zero, negative or garbage is page 1
    pub fn parse_page(raw: Option<&str>) -> u64 {
        raw.and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|&p| p > 0)
            .map_or(1, |p| p.min(MAX_PAGE_BOUND))
    }

    /// Offset of the first todo on the requested page, capped at `i64::MAX`
    fn offset(&self) -> i64 {
        self.page
            .saturating_sub(1)
            .checked_mul(self.per_page)
            .and_then(|offset| i64::try_from(offset).ok())
            .unwrap_or(i64::MAX)
    }

    /// Page size as bound into the query
    fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }

    /// URL builder carrying this request's search and filter
    pub fn page_urls(&self) -> PageUrl {
        let mut urls = PageUrl::new(self.path.clone());
        if let Some(term) = self.search_term() {
            urls = urls.with_param("search", term);
        }
        if let Some(filter) = self.filter {
            urls = urls.with_param("filter", filter.as_str());
        }
        urls
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct StatsRow {
    total: u64,
    finished: u64,
}

/// Repository for listing todos
///
/// Provides the paginated listing and the per-user statistics.
pub struct TodoLister<'a> {
    client: &'a Surreal<Db>,
}

impl<'a> TodoLister<'a> {
    /// Create a new TodoLister with the given database client
    pub fn new(client: &'a Surreal<Db>) -> Self {
        Self { client }
    }

    /// List one page of a user's todos matching the query
    ///
    /// Todos are ordered newest first; todos created in the same instant
    /// are ordered by insertion sequence, latest first.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the database query fails.
    pub async fn list(&self, query: &TodoQuery) -> DbResult<PagedResult<Todo>> {
        let conditions = Self::build_filter_conditions(query).join(" AND ");

        let statement = format!(
            "SELECT * FROM todo WHERE {conditions} \
             ORDER BY created_at DESC, seq DESC LIMIT $limit START $start; \
             SELECT count() AS total FROM todo WHERE {conditions} GROUP ALL;"
        );
        debug!(
            "Listing todos for user: {} (page {})",
            query.user_id, query.page
        );
        trace!("Query: {}", statement);

        let mut request = self
            .client
            .query(statement)
            .bind(("user_id", query.user_id.clone()))
            .bind(("limit", query.limit()))
            .bind(("start", query.offset()));
        if let Some(term) = query.search_term() {
            request = request.bind(("needle", term.to_lowercase()));
        }
        if let Some(finished) = query.filter.and_then(|f| f.required_state()) {
            request = request.bind(("finished", finished));
        }

        let mut response = request.await?.check()?;
        let rows: Vec<TodoRow> = response.take(0)?;
        let count: Option<CountRow> = response.take(1)?;
        let total = count.map(|c| c.total).unwrap_or(0);

        let page = PagedResult::new(
            rows,
            total,
            query.page,
            query.per_page,
            &query.page_urls(),
        )?;
        Ok(page.map(TodoRow::into_todo))
    }

    /// Count a user's todos by completion status
    ///
    /// # Errors
    ///
    /// Returns `DbError::Query` if the database query fails.
    pub async fn stats(&self, user_id: &str) -> DbResult<TodoStats> {
        let mut response = self
            .client
            .query(
                "SELECT count() AS total, count(is_finished = true) AS finished \
                 FROM todo WHERE user_id = $user_id GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .await?
            .check()?;
        let row: Option<StatsRow> = response.take(0)?;

        Ok(row
            .map(|r| TodoStats::from_counts(r.total, r.finished))
            .unwrap_or_default())
    }

    /// Build filter condition strings for the WHERE clause
    fn build_filter_conditions(query: &TodoQuery) -> Vec<String> {
        let mut conditions = vec!["user_id = $user_id".to_string()];

        if query.search_term().is_some() {
            conditions.push(
                "(string::contains(string::lowercase(title), $needle) \
                 OR string::contains(string::lowercase(description ?? \"\"), $needle))"
                    .to_string(),
            );
        }

        if query.filter.and_then(|f| f.required_state()).is_some() {
            conditions.push("is_finished = $finished".to_string());
        }

        conditions
    }
}
