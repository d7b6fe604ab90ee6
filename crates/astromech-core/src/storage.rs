//! String-keyed durable key-value store.
//!
//! Each key is one JSON file under `.astromech/storage/`. Values are opaque
//! strings; callers own the encoding.

use crate::error::Result;
use crate::{io, paths};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn open(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Current value for `key`, or `None` if it was never written.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        io::read_optional(&paths::storage_entry(&self.root, key))
    }

    /// Replace the value for `key` in full.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        io::atomic_write(&paths::storage_entry(&self.root, key), value.as_bytes())
    }
}
