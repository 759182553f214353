// src/tools/mod.rs

//! External tool artifacts: which jar, where it is published, where it is
//! cached and where its output record goes. Fetching lives in [`fetch`].

use std::fmt;
use std::path::{Path, PathBuf};

pub mod fetch;

pub use fetch::{ensure_artifact, ArtifactSource, HttpArtifactSource};

/// The two published tools this crate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Validator,
    MemoryFootprint,
}

impl ToolKind {
    /// File name of the jar in a release.
    pub fn artifact_name(self) -> &'static str {
        match self {
            ToolKind::Validator => "wff-validator.jar",
            ToolKind::MemoryFootprint => "memory-footprint.jar",
        }
    }

    /// Subdirectory of the build dir, also the stem of cached files.
    fn cache_stem(self) -> &'static str {
        match self {
            ToolKind::Validator => "validator",
            ToolKind::MemoryFootprint => "memory-footprint",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_stem())
    }
}

/// A tool jar pinned to a release tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArtifact {
    pub kind: ToolKind,
    pub url: String,
    pub jar_path: PathBuf,
    pub output_path: PathBuf,
}

impl ToolArtifact {
    pub fn new(kind: ToolKind, base_url: &str, release: &str, build_dir: &Path) -> Self {
        let stem = kind.cache_stem();
        let dir = build_dir.join(stem);
        Self {
            kind,
            url: format!(
                "{}/{}/{}",
                base_url.trim_end_matches('/'),
                release,
                kind.artifact_name()
            ),
            jar_path: dir.join(format!("{stem}-{release}.jar")),
            output_path: dir.join(format!("{stem}-{release}.txt")),
        }
    }

    /// A file next to the cached jar with the same tag-qualified stem.
    pub fn sibling(&self, extension: &str) -> PathBuf {
        self.jar_path.with_extension(extension)
    }
}
