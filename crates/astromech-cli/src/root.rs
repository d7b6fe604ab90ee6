use std::path::{Path, PathBuf};

/// Resolve the directory holding `.astromech/`.
///
/// Priority:
/// 1. `--root` flag / `ASTROMECH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.astromech/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_marked_ancestor(&cwd).unwrap_or(cwd)
}

fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(astromech_core::paths::ASTROMECH_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_astromech_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".astromech")).unwrap();
        let subdir = dir.path().join("routines/drafts");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_marked_ancestor(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn unmarked_tree_has_no_root() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("a/b");
        std::fs::create_dir_all(&subdir).unwrap();
        // The temp dir may itself sit under a marked directory; only check
        // that nothing below it was picked.
        if let Some(found) = find_marked_ancestor(&subdir) {
            assert!(!found.starts_with(dir.path()));
        }
    }
}
