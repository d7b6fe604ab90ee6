use crate::error::{AstromechError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ASTROMECH_DIR: &str = ".astromech";
pub const STORAGE_DIR: &str = ".astromech/storage";
pub const CONFIG_FILE: &str = ".astromech/config.yaml";

/// Storage key holding the serialized routine collection.
pub const ROUTINES_KEY: &str = "r2d2-routines";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn astromech_dir(root: &Path) -> PathBuf {
    root.join(ASTROMECH_DIR)
}

pub fn storage_dir(root: &Path) -> PathBuf {
    root.join(STORAGE_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// File backing a single storage key.
pub fn storage_entry(root: &Path, key: &str) -> PathBuf {
    storage_dir(root).join(format!("{key}.json"))
}

/// Fail with `NotInitialized` unless `astromech init` has run under `root`.
pub fn ensure_initialized(root: &Path) -> Result<()> {
    if astromech_dir(root).is_dir() {
        Ok(())
    } else {
        Err(AstromechError::NotInitialized)
    }
}
