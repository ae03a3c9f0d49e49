//! Data models for dodo
//!
//! Defines the Todo record as read from SurrealDB, the status filter used
//! by listings, and the typed inputs accepted by the repository layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::{Id, Thing};

/// A single todo owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Record key (the part after `todo:`)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Title, never empty
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Completion flag
    pub is_finished: bool,
    /// Relative path of the stored cover image
    pub cover: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Whether the todo belongs to the given user
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Internal row type for deserializing from SurrealDB
#[derive(Debug, Deserialize)]
pub(crate) struct TodoRow {
    id: Thing,
    user_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_finished: bool,
    #[serde(default)]
    cover: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TodoRow {
    /// Convert a TodoRow to a Todo
    pub(crate) fn into_todo(self) -> Todo {
        Todo {
            id: record_key(&self.id),
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            is_finished: self.is_finished,
            cover: self.cover,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Extract the raw key from a record id, without SurrealQL escaping
pub(crate) fn record_key(thing: &Thing) -> String {
    match &thing.id {
        Id::String(key) => key.clone(),
        other => other.to_string(),
    }
}

/// Completion status predicate for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status restriction
    #[default]
    All,
    /// Only finished todos
    Finished,
    /// Only unfinished todos
    Unfinished,
}

impl StatusFilter {
    /// Returns the string representation used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Finished => "finished",
            StatusFilter::Unfinished => "unfinished",
        }
    }

    /// Parse a filter name, returning None for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            "finished" => Some(StatusFilter::Finished),
            "unfinished" => Some(StatusFilter::Unfinished),
            _ => None,
        }
    }

    /// The `is_finished` value this filter requires, if any
    pub fn required_state(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Finished => Some(true),
            StatusFilter::Unfinished => Some(false),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a todo
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    /// Title (required)
    #[serde(default)]
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTodo {
    /// Create a new input with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Raw bytes of an uploaded cover image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverUpload {
    pub bytes: Vec<u8>,
}

impl CoverUpload {
    /// Wrap uploaded bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing was uploaded
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Per-user counts shown by the statistics widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    /// All todos owned by the user
    pub total: u64,
    /// Todos with `is_finished = true`
    pub finished: u64,
    /// Todos with `is_finished = false`
    pub unfinished: u64,
}

impl TodoStats {
    /// Build stats from a total and a finished count
    pub fn from_counts(total: u64, finished: u64) -> Self {
        Self {
            total,
            finished,
            unfinished: total.saturating_sub(finished),
        }
    }

    /// Share of finished todos as a whole percentage (0 when empty)
    pub fn percent_finished(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            self.finished * 100 / self.total
        }
    }
}
