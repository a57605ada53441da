//! Configuration storage abstraction.
//!
//! This module provides a small file-storage trait that can be
//! implemented differently on each platform:
//! - Host: `FileStorage`, rooted at a data directory
//! - Device: a flash filesystem mount
//! - Tests: `MemoryStorage`
//!
//! All methods are synchronous to support embedded platforms.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Path of the settings file inside the storage.
pub const CONFIG_PATH: &str = "/config.json";

/// Largest settings document accepted by `ConfigStore::load` (bytes).
pub const MAX_CONFIG_SIZE: usize = 1024;

/// Text file storage addressed by path.
pub trait Storage: Send + Sync {
    /// Size of the file in bytes.
    fn size(&self, path: &str) -> io::Result<u64>;

    /// Read the whole file. Content is not checked for UTF-8.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Replace the file's content.
    fn write(&self, path: &str, contents: &str) -> io::Result<()>;
}

/// File-based storage rooted at a directory.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the
/// target, so readers never observe a half-written settings file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a storage path (`/config.json`) to a file below the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for FileStorage {
    fn size(&self, path: &str) -> io::Result<u64> {
        Ok(fs::metadata(self.resolve(path))?.len())
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }

    fn write(&self, path: &str, contents: &str) -> io::Result<()> {
        let target = self.resolve(path);
        let mut tmp = target.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            e
        })
    }
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding a single file.
    pub fn with_file(path: &str, contents: &str) -> Self {
        let mut files = HashMap::new();
        files.insert(path.to_string(), contents.to_string());
        Self {
            files: RwLock::new(files),
            read_only: AtomicBool::new(false),
        }
    }

    /// Reject all writes with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Current content of a file, if any.
    pub fn contents(&self, path: &str) -> Option<String> {
        self.files.read().ok()?.get(path).cloned()
    }

    fn not_found(path: &str) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path))
    }

    fn poisoned() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "memory storage lock poisoned")
    }
}

impl Storage for MemoryStorage {
    fn size(&self, path: &str) -> io::Result<u64> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files
            .get(path)
            .map(|c| c.len() as u64)
            .ok_or_else(|| Self::not_found(path))
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files
            .get(path)
            .map(|c| c.as_bytes().to_vec())
            .ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &str, contents: &str) -> io::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("storage is read-only: {}", path),
            ));
        }
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
