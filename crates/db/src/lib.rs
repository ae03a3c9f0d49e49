//! Database module for dodo
//!
//! Provides SurrealDB connection management with the embedded SurrealKV
//! backend, schema initialization, the todo repositories and cover file
//! storage.

pub mod error;
pub mod id;
pub mod models;
pub mod repository;
pub mod schema;
pub mod storage;

pub use error::{DbError, DbResult, FieldError};
pub use models::{CoverUpload, NewTodo, StatusFilter, Todo, TodoStats};
pub use repository::{
    DEFAULT_PER_PAGE, PageLink, PageUrl, PagedResult, TodoLister, TodoQuery, TodoRepository,
    TodoUpdate,
};
pub use storage::{CoverStore, ImageKind, LocalCoverStore};

use std::path::{Path, PathBuf};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, SurrealKv};

/// Application directory name under the platform data directory
pub const APP_DIR: &str = "dodo";

/// Fallback data directory relative to the current working directory
pub const FALLBACK_DATA_DIR: &str = ".dodo";

/// SurrealDB namespace
pub const NAMESPACE: &str = "dodo";

/// SurrealDB database name
pub const DATABASE: &str = "main";

/// Root directory for everything dodo stores on disk.
///
/// Uses the platform's local data directory (for example
/// `~/.local/share/dodo` on Linux), falling back to `.dodo` relative to
/// the current working directory.
pub fn data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Database wrapper providing connection management for SurrealDB
#[derive(Clone)]
pub struct Database {
    /// The underlying SurrealDB client
    client: Surreal<Db>,
    /// Path where the database is stored
    path: PathBuf,
}

impl Database {
    /// Connect to a SurrealDB database at the specified path.
    ///
    /// Creates the database directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DbError::CreateDirectory` if directory creation fails.
    /// Returns `DbError::Connection` if database connection fails.
    pub async fn connect(path: &Path) -> DbResult<Self> {
        let path = Self::prepare_path(path)?;

        let client = Surreal::new::<SurrealKv>(path.clone())
            .await
            .map_err(|e| DbError::Connection {
                path: path.clone(),
                source: Box::new(e),
            })?;

        Ok(Self { client, path })
    }

    /// Initialize the database schema.
    ///
    /// Selects the dodo namespace and database, then defines the todo
    /// table and the sequence counter.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` if schema initialization fails.
    pub async fn init(&self) -> DbResult<()> {
        self.client
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| DbError::Schema(Box::new(e)))?;

        schema::init_schema(&self.client).await?;

        Ok(())
    }

    /// Connect and initialize in one step.
    pub async fn open(path: &Path) -> DbResult<Self> {
        let db = Self::connect(path).await?;
        db.init().await?;
        Ok(db)
    }

    /// Get a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Db> {
        &self.client
    }

    /// Get the path where the database is stored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository for todo mutations
    pub fn todos(&self) -> TodoRepository<'_> {
        TodoRepository::new(&self.client)
    }

    /// Lister for paginated todo queries and stats
    pub fn lister(&self) -> TodoLister<'_> {
        TodoLister::new(&self.client)
    }

    /// Default database path: `<data root>/data`
    pub fn default_path() -> PathBuf {
        data_root().join("data")
    }

    /// Prepare the database path by validating and creating directories.
    fn prepare_path(path: &Path) -> DbResult<PathBuf> {
        let path = path.to_path_buf();

        if path.as_os_str().is_empty() {
            return Err(DbError::InvalidPath {
                path,
                reason: "database path is empty".to_string(),
            });
        }

        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|e| DbError::CreateDirectory {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(path)
    }
}

// Ensure Database is Send + Sync for async compatibility
static_assertions::assert_impl_all!(Database: Send, Sync, Clone);
