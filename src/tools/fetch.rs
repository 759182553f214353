// src/tools/fetch.rs

//! Fetch-if-missing for tool jars.
//!
//! The cache is keyed by release tag through the jar path itself; an existing
//! file is trusted without re-verification. Downloads land in a temp file in
//! the destination directory and are moved into place without clobbering, so
//! a concurrent reader never observes a partial jar.

use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::{anyhow, Context};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::{Result, WffError};
use crate::tools::ToolArtifact;

/// Where artifact bytes come from.
///
/// Production uses [`HttpArtifactSource`]; tests provide canned bytes.
pub trait ArtifactSource: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send + 'a>>;
}

/// Plain HTTP(S) GET, following redirects.
#[derive(Debug, Clone, Default)]
pub struct HttpArtifactSource {
    client: reqwest::Client,
}

impl HttpArtifactSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl ArtifactSource for HttpArtifactSource {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("requesting {url}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(anyhow!("server answered {status}"));
            }

            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("reading body of {url}"))?;
            Ok(bytes.to_vec())
        })
    }
}

/// Make sure `artifact.jar_path` exists, downloading it if it does not.
///
/// Idempotent: once the jar is cached, further calls return immediately.
///
/// Works on the real filesystem rather than through [`crate::fs::FileSystem`]:
/// the no-clobber move needs a real temp file in the cache directory. The
/// blocking write runs on tokio's blocking pool.
pub async fn ensure_artifact(
    source: &dyn ArtifactSource,
    artifact: &ToolArtifact,
) -> Result<PathBuf> {
    let dest = artifact.jar_path.clone();

    if dest.is_file() {
        debug!(tool = %artifact.kind, path = ?dest, "tool already cached");
        return Ok(dest);
    }

    info!(tool = %artifact.kind, url = %artifact.url, "downloading tool");

    let bytes = source
        .fetch(&artifact.url)
        .await
        .map_err(|e| acquisition_error(artifact, format!("{e:#}")))?;

    if bytes.is_empty() {
        return Err(acquisition_error(artifact, "empty download".to_string()));
    }

    let size = bytes.len();
    let target = dest.clone();
    tokio::task::spawn_blocking(move || store_atomically(&target, &bytes))
        .await
        .map_err(|e| acquisition_error(artifact, format!("download writer panicked: {e}")))?
        .map_err(|e| acquisition_error(artifact, format!("{e:#}")))?;

    info!(tool = %artifact.kind, path = ?dest, size, "tool cached");
    Ok(dest)
}

fn store_atomically(dest: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = dest
        .parent()
        .ok_or_else(|| anyhow!("cache path {:?} has no parent directory", dest))?;
    std::fs::create_dir_all(dir).with_context(|| format!("creating dir {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    tmp.write_all(bytes).context("writing download")?;
    tmp.as_file().sync_all().context("syncing download")?;

    match tmp.persist_noclobber(dest) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            debug!(path = ?dest, "another writer cached the tool first; keeping theirs");
            Ok(())
        }
        Err(e) => Err(e.error).with_context(|| format!("moving download to {:?}", dest)),
    }
}

fn acquisition_error(artifact: &ToolArtifact, reason: String) -> WffError {
    WffError::ToolAcquisition {
        tool: artifact.kind.to_string(),
        url: artifact.url.clone(),
        reason,
    }
}
