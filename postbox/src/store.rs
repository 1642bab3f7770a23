use crate::models::Post;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corrupt post data in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    fn read(path: &Path, source: io::Error) -> Self {
        StoreError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write(path: &Path, source: io::Error) -> Self {
        StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What `load` does when the file exists but does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Log and carry on with an empty collection. The next save overwrites
    /// the corrupt file.
    #[default]
    Recover,
    Reject,
}

/// Owns the JSON file holding every post.
///
/// All reads and writes go through [`PostStore::begin`], which holds the
/// store's lock until the returned [`StoreTxn`] is dropped, so one
/// load-mutate-save sequence never interleaves with another.
///
/// The lock lives in the store value, not on the file: exactly one
/// `PostStore` may own a given path in a process. Two stores on the same
/// path do not exclude each other.
pub struct PostStore {
    path: PathBuf,
    corruption: CorruptionPolicy,
    lock: Mutex<()>,
}

impl PostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PostStore {
            path: path.into(),
            corruption: CorruptionPolicy::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.corruption = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the data file holding an empty collection if it is missing.
    /// Returns `true` when a new file was written.
    pub fn init(&self) -> Result<bool, StoreError> {
        let txn = self.begin();
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
            }
        }
        txn.save(&[])?;
        Ok(true)
    }

    /// The lock guards no data, so a guard left poisoned by a panicking
    /// holder is taken over as is.
    pub fn begin(&self) -> StoreTxn<'_> {
        let guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        StoreTxn {
            store: self,
            _guard: guard,
        }
    }
}

/// Exclusive access to the data file for the lifetime of the value.
pub struct StoreTxn<'a> {
    store: &'a PostStore,
    _guard: MutexGuard<'a, ()>,
}

impl StoreTxn<'_> {
    pub fn load(&self) -> Result<Vec<Post>, StoreError> {
        let path = &self.store.path;
        let data = fs::read_to_string(path).map_err(|e| StoreError::read(path, e))?;

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let posts: Vec<Post> = match serde_json::from_str(&data) {
            Ok(posts) => posts,
            Err(source) => match self.store.corruption {
                CorruptionPolicy::Recover => {
                    warn!(path = %path.display(), error = %source, "corrupt post data, starting from an empty collection");
                    Vec::new()
                }
                CorruptionPolicy::Reject => {
                    return Err(StoreError::Corrupt {
                        path: path.clone(),
                        source,
                    })
                }
            },
        };

        for post in &posts {
            debug!(title = %post.title, "loading post");
        }

        Ok(posts)
    }

    /// Rewrites the whole file. The new content goes to a temp file in the
    /// same directory first and is renamed over the target, so a reader sees
    /// either the old collection or the new one.
    pub fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        let path = &self.store.path;
        let data = serde_json::to_string_pretty(posts)?;

        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp_path, data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::write(&tmp_path, e));
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::write(path, e));
        }

        debug!(path = %path.display(), count = posts.len(), "saved posts");
        Ok(())
    }
}
