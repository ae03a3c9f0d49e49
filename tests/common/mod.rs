//! Test infrastructure for integration tests
//!
//! Provides isolated database and cover storage per test, plus command
//! builders with the optional fields filled in.

use dodo::commands::{
    AddCommand, Context, CoverCommand, DeleteCommand, DoneCommand, ListCommand, ShowCommand,
    UndoneCommand, UpdateCommand,
};
use dodo_db::{DEFAULT_PER_PAGE, Database, LocalCoverStore, StatusFilter};
use std::path::PathBuf;

/// A 1x1 PNG image
#[allow(dead_code)]
pub fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::new(1, 1)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Test context containing an isolated database, cover store and temp directory
pub struct TestContext {
    pub db: Database,
    pub store: LocalCoverStore,
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// Each call creates a uniquely named temp directory using process ID,
    /// thread ID, and nanosecond timestamp.
    pub async fn new() -> Self {
        Self::with_name("integration").await
    }

    /// Create a new test context with a specific suffix for debugging.
    pub async fn with_name(name: &str) -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "dodo-{}-{}-{:?}-{}",
            name,
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let db = Database::open(&temp_dir.join("data")).await.unwrap();
        let store = LocalCoverStore::open(&temp_dir.join("storage")).unwrap();

        Self {
            db,
            store,
            temp_dir,
        }
    }

    /// Command context acting as the given user
    pub fn as_user(&self, user: &str) -> Context {
        Context::new(self.db.clone(), self.store.clone(), Some(user.to_string()))
    }

    /// Command context with no user
    #[allow(dead_code)]
    pub fn anonymous(&self) -> Context {
        Context::new(self.db.clone(), self.store.clone(), None)
    }

    /// Write a file into the temp directory and return its path
    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.temp_dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    /// Number of files under the covers directory
    #[allow(dead_code)]
    pub fn cover_file_count(&self) -> usize {
        std::fs::read_dir(self.store.root().join("covers"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

pub fn add_cmd(title: &str) -> AddCommand {
    AddCommand {
        title: title.to_string(),
        description: None,
    }
}

#[allow(dead_code)]
pub fn add_cmd_with_description(title: &str, description: &str) -> AddCommand {
    AddCommand {
        title: title.to_string(),
        description: Some(description.to_string()),
    }
}

pub fn list_cmd() -> ListCommand {
    ListCommand {
        search: None,
        filter: None,
        page: 1,
        per_page: DEFAULT_PER_PAGE,
    }
}

#[allow(dead_code)]
pub fn list_cmd_with_search(search: &str) -> ListCommand {
    ListCommand {
        search: Some(search.to_string()),
        ..list_cmd()
    }
}

#[allow(dead_code)]
pub fn list_cmd_with_filter(filter: StatusFilter) -> ListCommand {
    ListCommand {
        filter: Some(filter),
        ..list_cmd()
    }
}

#[allow(dead_code)]
pub fn show_cmd(id: &str) -> ShowCommand {
    ShowCommand { id: id.to_string() }
}

#[allow(dead_code)]
pub fn rename_cmd(id: &str, title: &str) -> UpdateCommand {
    UpdateCommand {
        id: id.to_string(),
        title: Some(title.to_string()),
        description: None,
        clear_description: false,
    }
}

#[allow(dead_code)]
pub fn done_cmd(id: &str) -> DoneCommand {
    DoneCommand { id: id.to_string() }
}

#[allow(dead_code)]
pub fn undone_cmd(id: &str) -> UndoneCommand {
    UndoneCommand { id: id.to_string() }
}

#[allow(dead_code)]
pub fn delete_cmd(id: &str) -> DeleteCommand {
    DeleteCommand { id: id.to_string() }
}

#[allow(dead_code)]
pub fn cover_cmd(id: &str, file: Option<PathBuf>) -> CoverCommand {
    CoverCommand {
        id: id.to_string(),
        file,
        output: None,
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Titles of a listing page, in display order
pub async fn list_titles(ctx: &Context, cmd: ListCommand) -> Vec<String> {
    cmd.execute(ctx)
        .await
        .unwrap()
        .data
        .into_iter()
        .map(|t| t.title)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_creates_isolated_database() {
        let ctx1 = TestContext::new().await;
        let ctx2 = TestContext::new().await;
        assert_ne!(ctx1.temp_dir, ctx2.temp_dir);

        add_cmd("Only in one").execute(&ctx1.as_user("alice")).await.unwrap();

        assert_eq!(list_titles(&ctx1.as_user("alice"), list_cmd()).await.len(), 1);
        assert!(list_titles(&ctx2.as_user("alice"), list_cmd()).await.is_empty());
    }

    #[tokio::test]
    async fn test_context_with_name() {
        let ctx = TestContext::with_name("custom").await;
        assert!(ctx.temp_dir.to_string_lossy().contains("custom"));
    }
}
