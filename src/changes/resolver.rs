// src/changes/resolver.rs

//! Classify watched files against the previous run's fingerprints.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::changes::fingerprint::{compute_file_hash, Fingerprint};
use crate::changes::patterns::{collect_watched_files, relative_str, WatchedFilePredicate};
use crate::fs::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Unchanged,
}

impl ChangeKind {
    /// Whether a file with this classification must be validated.
    pub fn needs_processing(self) -> bool {
        matches!(self, ChangeKind::Added | ChangeKind::Modified)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
            ChangeKind::Unchanged => "unchanged",
        };
        f.write_str(s)
    }
}

/// A file under the watched root, current or remembered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    /// `root` joined with `rel_path`.
    pub path: PathBuf,
    /// Identity key: path relative to the watched root, forward slashes.
    pub rel_path: String,
    /// Current fingerprint; `None` once the file is gone.
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file: WatchedFile,
    pub kind: ChangeKind,
}

/// Result of one scan, ordered lexicographically by relative path.
///
/// Consumed once; a fresh [`resolve_changes`] call re-scans the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<FileChange>,
}

impl ChangeSet {
    pub fn changes(&self) -> &[FileChange] {
        &self.changes
    }

    /// Added and modified files, in order.
    pub fn to_process(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter().filter(|c| c.kind.needs_processing())
    }

    pub fn removed(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter().filter(|c| c.kind == ChangeKind::Removed)
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// Treat every existing file as new; removals are kept as they are.
    ///
    /// Used when the previous run's results can't be trusted (different
    /// validator, different format version, missing output record).
    pub fn into_full_rebuild(self) -> ChangeSet {
        let changes = self
            .changes
            .into_iter()
            .map(|mut c| {
                if c.kind != ChangeKind::Removed {
                    c.kind = ChangeKind::Added;
                }
                c
            })
            .collect();
        ChangeSet { changes }
    }

    /// Fingerprints of every file that currently exists.
    pub fn current_fingerprints(&self) -> BTreeMap<String, Fingerprint> {
        self.changes
            .iter()
            .filter_map(|c| {
                c.file
                    .fingerprint
                    .as_ref()
                    .map(|fp| (c.file.rel_path.clone(), fp.clone()))
            })
            .collect()
    }
}

impl IntoIterator for ChangeSet {
    type Item = FileChange;
    type IntoIter = std::vec::IntoIter<FileChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Scan `root`, fingerprint every watched file and diff against `previous`.
pub fn resolve_changes(
    fs: &dyn FileSystem,
    root: &Path,
    predicate: &WatchedFilePredicate,
    previous: &BTreeMap<String, Fingerprint>,
) -> Result<ChangeSet> {
    let mut current = BTreeMap::new();
    for path in collect_watched_files(fs, root, predicate)? {
        let rel = relative_str(root, &path)
            .ok_or_else(|| anyhow!("{:?} is not under watched root {:?}", path, root))?;
        let hash = compute_file_hash(fs, &path)?;
        current.insert(rel, hash);
    }

    let changes: Vec<FileChange> = classify(&current, previous)
        .into_iter()
        .map(|(rel_path, kind)| FileChange {
            file: WatchedFile {
                path: root.join(&rel_path),
                fingerprint: current.get(&rel_path).cloned(),
                rel_path,
            },
            kind,
        })
        .collect();

    let set = ChangeSet { changes };
    debug!(
        ?root,
        added = set.count(ChangeKind::Added),
        modified = set.count(ChangeKind::Modified),
        removed = set.count(ChangeKind::Removed),
        unchanged = set.count(ChangeKind::Unchanged),
        "resolved change set"
    );
    Ok(set)
}

/// Pure classification over the union of both key sets, in key order.
pub fn classify(
    current: &BTreeMap<String, Fingerprint>,
    previous: &BTreeMap<String, Fingerprint>,
) -> Vec<(String, ChangeKind)> {
    let mut keys: Vec<&String> = current.keys().chain(previous.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|key| {
            let kind = match (current.get(key), previous.get(key)) {
                (Some(_), None) => ChangeKind::Added,
                (None, Some(_)) => ChangeKind::Removed,
                (Some(now), Some(before)) if now != before => ChangeKind::Modified,
                _ => ChangeKind::Unchanged,
            };
            (key.clone(), kind)
        })
        .collect()
}
