// src/changes/fingerprint.rs

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::manifest::ToolVersion;

/// Content fingerprint of a file (blake3, hex).
pub type Fingerprint = String;

/// Compute the fingerprint of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<Fingerprint> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading file for hashing: {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// What the previous validation run saw.
///
/// File keys are paths relative to the watched root, with forward slashes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    /// Fingerprint of the validator jar used.
    pub tool: Option<Fingerprint>,
    /// Format version passed to the validator.
    pub version: Option<ToolVersion>,
    pub files: BTreeMap<String, Fingerprint>,
}

/// Persistence for [`RunState`] between runs.
///
/// This is the only memory the runner has of earlier executions; an empty
/// state means every current file is treated as new.
pub trait FingerprintStore: Send {
    fn load(&self) -> Result<RunState>;
    fn save(&mut self, state: &RunState) -> Result<()>;
}

/// Line-based sidecar file:
///
/// ```text
/// @tool <hex>
/// @version <n>
/// <hex> <relative/path.xml>
/// ```
///
/// The path comes last so it may contain spaces. Backslashes and line breaks
/// in paths are escaped as `\\`, `\n` and `\r`.
#[derive(Debug)]
pub struct FileFingerprintStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileFingerprintStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FingerprintStore for FileFingerprintStore {
    fn load(&self) -> Result<RunState> {
        if !self.fs.exists(&self.path) {
            debug!(path = ?self.path, "no fingerprint state yet");
            return Ok(RunState::default());
        }

        let contents = self
            .fs
            .read_to_string(&self.path)
            .with_context(|| format!("reading fingerprint state at {:?}", self.path))?;
        Ok(parse_state(&contents))
    }

    fn save(&mut self, state: &RunState) -> Result<()> {
        self.fs
            .write(&self.path, render_state(state).as_bytes())
            .with_context(|| format!("writing fingerprint state at {:?}", self.path))?;
        info!(path = ?self.path, files = state.files.len(), "stored fingerprint state");
        Ok(())
    }
}

/// Keeps state in memory only (lost on restart).
#[derive(Debug, Default)]
pub struct MemoryFingerprintStore {
    state: RunState,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RunState) -> Self {
        Self { state }
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn load(&self) -> Result<RunState> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &RunState) -> Result<()> {
        self.state = state.clone();
        Ok(())
    }
}

fn parse_state(contents: &str) -> RunState {
    let mut state = RunState::default();

    for line in contents.lines() {
        if line.trim_end().is_empty() {
            continue;
        }
        let Some((key, rest)) = line.split_once(' ') else {
            continue;
        };
        match key {
            "@tool" => state.tool = Some(rest.trim().to_string()),
            "@version" => state.version = rest.trim().parse().ok().map(ToolVersion),
            hash => {
                state.files.insert(unescape_path(rest), hash.to_string());
            }
        }
    }

    state
}

fn render_state(state: &RunState) -> String {
    let mut out = String::new();
    if let Some(tool) = &state.tool {
        out.push_str(&format!("@tool {tool}\n"));
    }
    if let Some(version) = state.version {
        out.push_str(&format!("@version {version}\n"));
    }
    for (path, hash) in state.files.iter() {
        out.push_str(&format!("{hash} {}\n", escape_path(path)));
    }
    out
}

fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_path(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
