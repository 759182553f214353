// src/changes/patterns.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::config::model::WatchSection;
use crate::fs::FileSystem;

/// Which files under the watched root are eligible for validation.
///
/// A file is watched when its name ends with `.<extension>` and the name of
/// its immediate parent directory starts with `dir_prefix`. Both checks are
/// case-sensitive. File size plays no part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFilePredicate {
    suffix: String,
    dir_prefix: String,
}

impl WatchedFilePredicate {
    pub fn new(extension: &str, dir_prefix: &str) -> Self {
        Self {
            suffix: format!(".{}", extension.trim_start_matches('.')),
            dir_prefix: dir_prefix.to_string(),
        }
    }

    pub fn from_config(watch: &WatchSection) -> Self {
        Self::new(&watch.extension, &watch.dir_prefix)
    }

    pub fn matches(&self, path: &Path) -> bool {
        let name_ok = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.suffix));
        if !name_ok {
            return false;
        }

        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&self.dir_prefix))
    }
}

impl Default for WatchedFilePredicate {
    fn default() -> Self {
        Self::from_config(&WatchSection::default())
    }
}

/// Collect all files under `root` accepted by `predicate`, sorted by path.
///
/// A missing root is an empty tree, not an error.
pub fn collect_watched_files(
    fs: &dyn FileSystem,
    root: &Path,
    predicate: &WatchedFilePredicate,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !fs.is_dir(root) {
        debug!(?root, "watched root does not exist; nothing to scan");
        return Ok(files);
    }

    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) && predicate.matches(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// `path` relative to `root`, with forward slashes.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
