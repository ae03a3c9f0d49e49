//! Todo repository for CRUD operations on todos
//!
//! Provides a repository pattern implementation for todo mutations,
//! encapsulating SurrealDB queries. Every mutation first checks that the
//! caller owns the todo.

use crate::error::{DbError, DbResult};
use crate::id::IdGenerator;
use crate::models::{CoverUpload, NewTodo, Todo, TodoRow};
use crate::repository::validation;
use crate::storage::CoverStore;
use serde::{Deserialize, Deserializer};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, trace, warn};

/// Repository for todo CRUD operations
///
/// Encapsulates database queries for todos, providing a clean API
/// that hides the underlying SurrealDB implementation details.
pub struct TodoRepository<'a> {
    client: &'a Surreal<Db>,
}

/// Update structure for partial todo updates
///
/// `None` leaves a field untouched. For `description`, `Some(None)` clears
/// it; in JSON that is an explicit `null`, while a missing key means
/// "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoUpdate {
    /// New title (if Some)
    #[serde(default)]
    pub title: Option<String>,
    /// New description, or Some(None) to clear it
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// New completion flag (if Some)
    #[serde(default)]
    pub is_finished: Option<bool>,
}

/// Deserialize a field that is present in the input, keeping explicit nulls
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TodoUpdate {
    /// Create a new empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Clear the description
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Set the completion flag
    pub fn with_finished(mut self, finished: bool) -> Self {
        self.is_finished = Some(finished);
        self
    }

    /// Check if any updates are specified
    pub fn has_updates(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.is_finished.is_some()
    }
}

/// Trim a description, treating blank text as absent
fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

impl<'a> TodoRepository<'a> {
    /// Create a new TodoRepository with the given database client
    pub fn new(client: &'a Surreal<Db>) -> Self {
        Self { client }
    }

    /// Check if a todo with the given ID exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Get a todo by ID without an ownership check.
    ///
    /// # Returns
    ///
    /// `Some(Todo)` if found, `None` otherwise.
    pub async fn get(&self, id: &str) -> DbResult<Option<Todo>> {
        trace!("Fetching todo: {}", id);
        let mut result = self
            .client
            .query(r#"SELECT * FROM type::thing("todo", $id)"#)
            .bind(("id", id.to_string()))
            .await?;
        let row: Option<TodoRow> = result.take(0)?;
        Ok(row.map(TodoRow::into_todo))
    }

    /// Get a todo owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if no todo has this ID.
    /// Returns `DbError::Unauthorized` if the todo belongs to someone else.
    pub async fn find_owned(&self, user_id: &str, id: &str) -> DbResult<Todo> {
        let todo = self.get(id).await?.ok_or_else(|| DbError::NotFound {
            todo_id: id.to_string(),
        })?;

        if !todo.is_owned_by(user_id) {
            warn!("User {} attempted to access todo {}", user_id, id);
            return Err(DbError::Unauthorized {
                todo_id: id.to_string(),
            });
        }

        Ok(todo)
    }

    /// Create a new todo for the given user.
    ///
    /// The title is trimmed and a blank description is stored as absent.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Validation` if the input breaks a field rule.
    /// Returns `DbError::Query` if the database operation fails.
    pub async fn create(&self, user_id: &str, new: &NewTodo) -> DbResult<Todo> {
        validation::validate_user(user_id)?;
        validation::validate_new_todo(new)?;

        let id = self.generate_unique_id(&new.title).await?;
        let seq = self.next_sequence().await?;
        let description = normalize_description(new.description.as_deref());

        debug!("Creating todo: {} for user: {}", id, user_id);
        trace!("Todo input: {:?}", new);

        let description_str = match &description {
            Some(_) => "$description",
            None => "NONE",
        };

        let query = format!(
            r#"CREATE type::thing("todo", $id) SET
                user_id = $user_id,
                title = $title,
                description = {},
                is_finished = false,
                seq = $seq"#,
            description_str
        );

        let mut statement = self
            .client
            .query(query)
            .bind(("id", id.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("title", new.title.trim().to_string()))
            .bind(("seq", seq));
        if let Some(description) = description {
            statement = statement.bind(("description", description));
        }
        statement.await?.check()?;

        self.get(&id)
            .await?
            .ok_or(DbError::NotFound { todo_id: id })
    }

    /// Apply a partial update to a todo owned by the given user.
    ///
    /// An update with no fields leaves the todo untouched and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` / `DbError::Unauthorized` from the ownership check.
    /// Returns `DbError::Validation` if a present field breaks a rule.
    /// Returns `DbError::Query` if the database operation fails.
    pub async fn update(&self, user_id: &str, id: &str, updates: &TodoUpdate) -> DbResult<Todo> {
        let todo = self.find_owned(user_id, id).await?;
        validation::validate_update(updates)?;

        if !updates.has_updates() {
            debug!("No updates specified for todo: {}", id);
            return Ok(todo);
        }

        debug!("Updating todo: {}", id);
        trace!("Updates: {:?}", updates);

        let description = updates
            .description
            .as_ref()
            .map(|d| normalize_description(d.as_deref()));

        let mut field_updates = Vec::new();
        if updates.title.is_some() {
            field_updates.push("title = $title");
        }
        match &description {
            Some(Some(_)) => field_updates.push("description = $description"),
            Some(None) => field_updates.push("description = NONE"),
            None => {}
        }
        if updates.is_finished.is_some() {
            field_updates.push("is_finished = $is_finished");
        }
        field_updates.push("updated_at = time::now()");

        let query = format!(
            r#"UPDATE type::thing("todo", $id) SET {}"#,
            field_updates.join(", ")
        );
        trace!("Query: {}", query);

        let mut statement = self.client.query(query).bind(("id", id.to_string()));
        if let Some(title) = &updates.title {
            statement = statement.bind(("title", title.trim().to_string()));
        }
        if let Some(Some(description)) = description {
            statement = statement.bind(("description", description));
        }
        if let Some(finished) = updates.is_finished {
            statement = statement.bind(("is_finished", finished));
        }
        statement.await?.check()?;

        self.find_owned(user_id, id).await
    }

    /// Replace the cover image of a todo owned by the given user.
    ///
    /// The new file is stored and saved before the previous file is
    /// released, so the todo never points at a deleted file. Decoding and
    /// file access run on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` / `DbError::Unauthorized` from the ownership check.
    /// Returns `DbError::Validation` if the upload is not an acceptable image.
    /// Returns `DbError::Storage` if the file cannot be written.
    pub async fn set_cover<S>(
        &self,
        user_id: &str,
        id: &str,
        upload: CoverUpload,
        store: &S,
    ) -> DbResult<Todo>
    where
        S: CoverStore + Clone + 'static,
    {
        let todo = self.find_owned(user_id, id).await?;

        let path = on_store(store, move |store| {
            let kind = validation::validate_cover(&upload)?;
            store.store(&upload.bytes, kind)
        })
        .await?;
        debug!("Setting cover for todo: {} to {}", id, path);

        let saved = self
            .client
            .query(r#"UPDATE type::thing("todo", $id) SET cover = $cover, updated_at = time::now()"#)
            .bind(("id", id.to_string()))
            .bind(("cover", path.clone()))
            .await
            .and_then(|response| response.check());

        if let Err(e) = saved {
            release_cover(store, path).await;
            return Err(e.into());
        }

        if let Some(previous) = todo.cover {
            release_cover(store, previous).await;
        }

        self.find_owned(user_id, id).await
    }

    /// Stored cover path of a todo owned by the given user.
    pub async fn cover(&self, user_id: &str, id: &str) -> DbResult<Option<String>> {
        Ok(self.find_owned(user_id, id).await?.cover)
    }

    /// Delete a todo owned by the given user, then release its cover file.
    ///
    /// A cover file that cannot be released is logged and left behind; the
    /// todo is gone either way.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` / `DbError::Unauthorized` from the ownership check.
    /// Returns `DbError::Query` if the database operation fails.
    pub async fn delete<S>(&self, user_id: &str, id: &str, store: &S) -> DbResult<()>
    where
        S: CoverStore + Clone + 'static,
    {
        let todo = self.find_owned(user_id, id).await?;

        debug!("Deleting todo: {}", id);
        self.client
            .query(r#"DELETE type::thing("todo", $id)"#)
            .bind(("id", id.to_string()))
            .await?
            .check()?;

        if let Some(cover) = todo.cover {
            release_cover(store, cover).await;
        }
        Ok(())
    }

    /// Generate a unique ID that doesn't collide with existing todos.
    async fn generate_unique_id(&self, title: &str) -> DbResult<String> {
        let mut generator = IdGenerator::new(title);

        while let Some(id) = generator.next_id() {
            if !self.exists(&id).await? {
                return Ok(id);
            }
            trace!("Id collision: {}", id);
        }

        Err(DbError::IdExhausted {
            attempts: crate::id::MAX_ATTEMPTS,
        })
    }

    /// Take the next value of the insertion sequence.
    async fn next_sequence(&self) -> DbResult<i64> {
        let mut result = self
            .client
            .query("UPSERT sequence:todo SET current += 1 RETURN VALUE current")
            .await?;
        let current: Option<i64> = result.take(0)?;
        Ok(current.unwrap_or_default())
    }
}

/// Run a cover store operation on the blocking thread pool
async fn on_store<S, T, F>(store: &S, op: F) -> DbResult<T>
where
    S: CoverStore + Clone + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> DbResult<T> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store)).await?
}

/// Release a cover file that no todo refers to any more
async fn release_cover<S>(store: &S, path: String)
where
    S: CoverStore + Clone + 'static,
{
    let target = path.clone();
    if let Err(e) = on_store(store, move |store| store.delete(&target)).await {
        warn!("Failed to release cover {}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ImageKind, LocalCoverStore, fixtures};
    use std::sync::Arc;
    use crate::test_utils::{TestDb, create_test_db};

    async fn setup() -> (TestDb, LocalCoverStore) {
        let db = create_test_db().await.unwrap();
        let store = LocalCoverStore::open(&db.dir.join("storage")).unwrap();
        (db, store)
    }

    // ========================================
    // TodoUpdate tests
    // ========================================

    #[test]
    fn test_todo_update_default_has_no_updates() {
        assert!(!TodoUpdate::new().has_updates());
    }

    #[test]
    fn test_todo_update_builder() {
        let update = TodoUpdate::new()
            .with_title("New")
            .with_description("Details")
            .with_finished(true);
        assert_eq!(update.title, Some("New".to_string()));
        assert_eq!(update.description, Some(Some("Details".to_string())));
        assert_eq!(update.is_finished, Some(true));
        assert!(update.has_updates());
    }

    #[test]
    fn test_todo_update_clear_description() {
        let update = TodoUpdate::new().clear_description();
        assert_eq!(update.description, Some(None));
        assert!(update.has_updates());
    }

    #[test]
    fn test_todo_update_deserialize_distinguishes_null() {
        let missing: TodoUpdate = serde_json::from_str(r#"{"is_finished": true}"#).unwrap();
        assert_eq!(missing.description, None);
        assert_eq!(missing.is_finished, Some(true));

        let null: TodoUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(null.description, Some(None));

        let set: TodoUpdate = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(set.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None), None);
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(
            normalize_description(Some("  two liters ")),
            Some("two liters".to_string())
        );
    }

    // ========================================
    // Create / get
    // ========================================

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let todo = repo
            .create("alice", &NewTodo::new("  Buy milk  ").with_description("Two liters"))
            .await
            .unwrap();

        assert_eq!(todo.user_id, "alice");
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, Some("Two liters".to_string()));
        assert!(!todo.is_finished);
        assert!(todo.cover.is_none());
        assert_eq!(todo.id.len(), crate::id::ID_LENGTH);

        let fetched = repo.get(&todo.id).await.unwrap().unwrap();
        assert_eq!(fetched, todo);
    }

    #[tokio::test]
    async fn test_create_blank_description_is_absent() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let todo = repo
            .create("alice", &NewTodo::new("Buy milk").with_description("   "))
            .await
            .unwrap();
        assert!(todo.description.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_title() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let err = repo.create("alice", &NewTodo::new("")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation { .. }));

        let all = crate::test_utils::list_all_todos(&db.client).await.unwrap();
        assert!(all.is_empty(), "Failed validation must not create a row");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_user() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let err = repo.create("", &NewTodo::new("Buy milk")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_sequence() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let first = repo.create("alice", &NewTodo::new("First")).await.unwrap();
        let second = repo.create("alice", &NewTodo::new("Second")).await.unwrap();

        let first_seq = crate::test_utils::get_todo_seq(&db.client, &first.id)
            .await
            .unwrap();
        let second_seq = crate::test_utils::get_todo_seq(&db.client, &second.id)
            .await
            .unwrap();
        assert!(second_seq > first_seq);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        assert!(repo.get("nope00").await.unwrap().is_none());
        assert!(!repo.exists("nope00").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_owned_checks_owner() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Mine")).await.unwrap();

        assert!(repo.find_owned("alice", &todo.id).await.is_ok());
        assert!(matches!(
            repo.find_owned("bob", &todo.id).await,
            Err(DbError::Unauthorized { .. })
        ));
        assert!(matches!(
            repo.find_owned("alice", "nope00").await,
            Err(DbError::NotFound { .. })
        ));
    }

    // ========================================
    // Update
    // ========================================

    #[tokio::test]
    async fn test_update_title_keeps_other_fields() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo
            .create("alice", &NewTodo::new("Old").with_description("Keep me"))
            .await
            .unwrap();

        let updated = repo
            .update("alice", &todo.id, &TodoUpdate::new().with_title("New"))
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, Some("Keep me".to_string()));
        assert!(!updated.is_finished);
        assert_eq!(updated.created_at, todo.created_at);
        assert!(updated.updated_at >= todo.updated_at);
    }

    #[tokio::test]
    async fn test_update_toggles_finished() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let done = repo
            .update("alice", &todo.id, &TodoUpdate::new().with_finished(true))
            .await
            .unwrap();
        assert!(done.is_finished);

        let undone = repo
            .update("alice", &todo.id, &TodoUpdate::new().with_finished(false))
            .await
            .unwrap();
        assert!(!undone.is_finished);
    }

    #[tokio::test]
    async fn test_update_clears_description() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo
            .create("alice", &NewTodo::new("Task").with_description("Details"))
            .await
            .unwrap();

        let updated = repo
            .update("alice", &todo.id, &TodoUpdate::new().clear_description())
            .await
            .unwrap();
        assert!(updated.description.is_none());
    }

    #[tokio::test]
    async fn test_update_empty_is_noop() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let same = repo
            .update("alice", &todo.id, &TodoUpdate::new())
            .await
            .unwrap();
        assert_eq!(same, todo);
    }

    #[tokio::test]
    async fn test_update_invalid_title_changes_nothing() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let err = repo
            .update(
                "alice",
                &todo.id,
                &TodoUpdate::new().with_title("").with_finished(true),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation { .. }));

        let unchanged = repo.get(&todo.id).await.unwrap().unwrap();
        assert_eq!(unchanged, todo);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_rejected() {
        let (db, _store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let err = repo
            .update("bob", &todo.id, &TodoUpdate::new().with_finished(true))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Unauthorized { .. }));

        let unchanged = repo.get(&todo.id).await.unwrap().unwrap();
        assert!(!unchanged.is_finished);
    }

    // ========================================
    // Cover / delete
    // ========================================

    #[tokio::test]
    async fn test_set_cover_stores_file() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let updated = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::png()), &store)
            .await
            .unwrap();

        let path = updated.cover.expect("cover should be set");
        assert!(path.starts_with("covers/") && path.ends_with(".png"));
        assert_eq!(store.read(&path).unwrap(), fixtures::png());
        assert_eq!(
            repo.cover("alice", &todo.id).await.unwrap(),
            Some(path.clone())
        );
    }

    #[tokio::test]
    async fn test_replacing_cover_releases_previous_file() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let first = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::png()), &store)
            .await
            .unwrap()
            .cover
            .unwrap();
        let second = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::jpeg()), &store)
            .await
            .unwrap()
            .cover
            .unwrap();

        assert_ne!(first, second);
        assert!(!store.root().join(&first).exists(), "old cover must be deleted");
        assert!(store.root().join(&second).exists());
    }

    #[tokio::test]
    async fn test_invalid_cover_changes_nothing() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let err = repo
            .set_cover(
                "alice",
                &todo.id,
                CoverUpload::new(b"not an image".to_vec()),
                &store,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation { .. }));
        assert!(repo.get(&todo.id).await.unwrap().unwrap().cover.is_none());

        let stored = std::fs::read_dir(store.root().join(crate::storage::COVERS_DIR))
            .unwrap()
            .count();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_set_cover_by_other_user_is_rejected() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let err = repo
            .set_cover("bob", &todo.id, CoverUpload::new(fixtures::png()), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Unauthorized { .. }));
        assert!(matches!(
            repo.cover("bob", &todo.id).await,
            Err(DbError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_todo_and_cover() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();
        let path = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::webp()), &store)
            .await
            .unwrap()
            .cover
            .unwrap();

        repo.delete("alice", &todo.id, &store).await.unwrap();

        assert!(repo.get(&todo.id).await.unwrap().is_none());
        assert!(!store.root().join(&path).exists());
        assert!(matches!(
            repo.cover("alice", &todo.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    /// Store whose files can never be removed
    #[derive(Clone)]
    struct UndeletableStore(LocalCoverStore);

    impl CoverStore for UndeletableStore {
        fn store(&self, bytes: &[u8], kind: ImageKind) -> DbResult<String> {
            self.0.store(bytes, kind)
        }

        fn delete(&self, path: &str) -> DbResult<()> {
            Err(DbError::Storage {
                path: self.0.root().join(path),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn read(&self, path: &str) -> DbResult<Vec<u8>> {
            self.0.read(path)
        }
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_cover_cannot_be_released() {
        let (db, store) = setup().await;
        let store = UndeletableStore(store);
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();
        let path = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::png()), &store)
            .await
            .unwrap()
            .cover
            .unwrap();

        repo.delete("alice", &todo.id, &store).await.unwrap();

        assert!(repo.get(&todo.id).await.unwrap().is_none());
        assert!(store.0.root().join(&path).exists(), "file is left behind");
    }

    #[tokio::test]
    async fn test_replacing_cover_succeeds_when_previous_cannot_be_released() {
        let (db, store) = setup().await;
        let store = UndeletableStore(store);
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        repo.set_cover("alice", &todo.id, CoverUpload::new(fixtures::png()), &store)
            .await
            .unwrap();
        let replaced = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::jpeg()), &store)
            .await
            .unwrap();

        assert!(replaced.cover.unwrap().ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_cover_operations_accept_shared_store() {
        let (db, store) = setup().await;
        let shared: Arc<dyn CoverStore> = Arc::new(store.clone());
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let path = repo
            .set_cover("alice", &todo.id, CoverUpload::new(fixtures::webp()), &shared)
            .await
            .unwrap()
            .cover
            .unwrap();
        assert_eq!(shared.read(&path).unwrap(), fixtures::webp());

        repo.delete("alice", &todo.id, &shared).await.unwrap();
        assert!(!store.root().join(&path).exists());
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_rejected() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);
        let todo = repo.create("alice", &NewTodo::new("Task")).await.unwrap();

        let err = repo.delete("bob", &todo.id, &store).await.unwrap_err();
        assert!(matches!(err, DbError::Unauthorized { .. }));
        assert!(repo.exists(&todo.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_todo() {
        let (db, store) = setup().await;
        let repo = TodoRepository::new(&db.client);

        let err = repo.delete("alice", "nope00", &store).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
