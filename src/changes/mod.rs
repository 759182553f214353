// src/changes/mod.rs

//! Incremental input tracking for the validation task.
//!
//! This module is responsible for:
//! - Deciding which files under the resource root are watched (`patterns`).
//! - Fingerprinting them and persisting the fingerprints between runs
//!   (`fingerprint`).
//! - Classifying each file as added, modified, removed or unchanged relative
//!   to the previous run (`resolver`).
//!
//! It does **not** run any tool; that is the validation runner's job.

pub mod fingerprint;
pub mod patterns;
pub mod resolver;

pub use fingerprint::{
    compute_file_hash, FileFingerprintStore, Fingerprint, FingerprintStore,
    MemoryFingerprintStore, RunState,
};
pub use patterns::{collect_watched_files, WatchedFilePredicate};
pub use resolver::{classify, resolve_changes, ChangeKind, ChangeSet, FileChange, WatchedFile};
