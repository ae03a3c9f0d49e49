//! Cover image storage
//!
//! Cover files live outside the database. Todos only keep the relative
//! path returned by [`CoverStore::store`], e.g. `covers/Xy12....png`.

use crate::error::{DbError, DbResult};
use image::ImageFormat;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Directory (relative to the storage root) that holds cover files
pub const COVERS_DIR: &str = "covers";

/// Length of the random part of a stored file name
const FILE_NAME_LENGTH: usize = 40;

/// Image formats accepted as covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Detect the format of a complete image.
    ///
    /// The content must both carry an accepted format's signature and
    /// decode as that format.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let format = image::guess_format(bytes).ok()?;
        let kind = Self::from_format(format)?;
        if let Err(e) = image::load_from_memory_with_format(bytes, format) {
            trace!("Rejecting {:?} content that does not decode: {}", format, e);
            return None;
        }
        Some(kind)
    }

    /// Guess the format from the signature alone, without decoding
    pub fn guess(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes).ok().and_then(Self::from_format)
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::WebP => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// Resolve the format from a stored path's extension
    pub fn from_path(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    /// File extension used when storing
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }

    /// MIME type for serving the file
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Webp => "image/webp",
        }
    }
}

/// File storage for cover images
pub trait CoverStore: Send + Sync {
    /// Store a new file and return its relative path
    fn store(&self, bytes: &[u8], kind: ImageKind) -> DbResult<String>;

    /// Delete a stored file. Deleting a missing file is not an error.
    fn delete(&self, path: &str) -> DbResult<()>;

    /// Read a stored file
    fn read(&self, path: &str) -> DbResult<Vec<u8>>;
}

impl<S: CoverStore + ?Sized> CoverStore for Arc<S> {
    fn store(&self, bytes: &[u8], kind: ImageKind) -> DbResult<String> {
        (**self).store(bytes, kind)
    }

    fn delete(&self, path: &str) -> DbResult<()> {
        (**self).delete(path)
    }

    fn read(&self, path: &str) -> DbResult<Vec<u8>> {
        (**self).read(path)
    }
}

/// Cover storage on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalCoverStore {
    root: PathBuf,
}

impl LocalCoverStore {
    /// Open a store rooted at `root`, creating the covers directory.
    ///
    /// # Errors
    ///
    /// Returns `DbError::CreateDirectory` if the directory cannot be created.
    pub fn open(root: &Path) -> DbResult<Self> {
        let covers = root.join(COVERS_DIR);
        if !covers.exists() {
            std::fs::create_dir_all(&covers).map_err(|e| DbError::CreateDirectory {
                path: covers.clone(),
                source: e,
            })?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Default storage root: `<data dir>/dodo/storage`
    pub fn default_path() -> PathBuf {
        crate::data_root().join("storage")
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored path
    pub fn full_path(&self, path: &str) -> DbResult<PathBuf> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !is_plain {
            return Err(DbError::InvalidPath {
                path: relative.to_path_buf(),
                reason: "stored paths must be relative and stay inside the storage root"
                    .to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn random_name() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(FILE_NAME_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl CoverStore for LocalCoverStore {
    fn store(&self, bytes: &[u8], kind: ImageKind) -> DbResult<String> {
        let path = format!(
            "{}/{}.{}",
            COVERS_DIR,
            Self::random_name(),
            kind.extension()
        );
        let full = self.full_path(&path)?;
        debug!("Storing cover: {} ({} bytes)", path, bytes.len());
        std::fs::write(&full, bytes).map_err(|e| DbError::Storage {
            path: full.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn delete(&self, path: &str) -> DbResult<()> {
        let full = self.full_path(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => {
                debug!("Deleted cover: {}", path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!("Cover already gone: {}", path);
                Ok(())
            }
            Err(e) => Err(DbError::Storage {
                path: full,
                source: e,
            }),
        }
    }

    fn read(&self, path: &str) -> DbResult<Vec<u8>> {
        let full = self.full_path(path)?;
        std::fs::read(&full).map_err(|e| DbError::Storage {
            path: full.clone(),
            source: e,
        })
    }
}

static_assertions::assert_impl_all!(LocalCoverStore: Send, Sync);
static_assertions::assert_impl_all!(Arc<dyn CoverStore>: CoverStore, Clone);
