// src/device/apk.rs

//! Locating the packaged APK in the packaging output directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{Result, WffError};
use crate::fs::FileSystem;

/// Written by the packaging step next to the APKs it produced.
pub const OUTPUT_METADATA_FILE: &str = "output-metadata.json";

#[derive(Debug, Deserialize)]
struct OutputMetadata {
    #[serde(default)]
    elements: Vec<OutputElement>,
}

#[derive(Debug, Deserialize)]
struct OutputElement {
    #[serde(rename = "outputFile")]
    output_file: String,
}

/// Find the APK produced by packaging.
///
/// The first element of `output-metadata.json` wins when it names an
/// existing file. Otherwise the lexicographically first `*.apk` in `apk_dir`
/// is used.
pub fn resolve_apk(fs: &dyn FileSystem, apk_dir: &Path) -> Result<PathBuf> {
    if let Some(apk) = apk_from_metadata(fs, apk_dir) {
        debug!(?apk, "apk from output metadata");
        return Ok(apk);
    }

    if !fs.is_dir(apk_dir) {
        return Err(WffError::ApkNotFound(apk_dir.to_path_buf()));
    }

    let mut apks: Vec<PathBuf> = fs
        .read_dir(apk_dir)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "apk") && fs.is_file(p))
        .collect();
    apks.sort();

    match apks.into_iter().next() {
        Some(apk) => {
            debug!(?apk, "apk from directory scan");
            Ok(apk)
        }
        None => Err(WffError::ApkNotFound(apk_dir.to_path_buf())),
    }
}

fn apk_from_metadata(fs: &dyn FileSystem, apk_dir: &Path) -> Option<PathBuf> {
    let path = apk_dir.join(OUTPUT_METADATA_FILE);
    if !fs.is_file(&path) {
        return None;
    }

    let metadata: OutputMetadata = match fs
        .read_to_string(&path)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from))
    {
        Ok(m) => m,
        Err(e) => {
            warn!(?path, error = %e, "ignoring unreadable output metadata");
            return None;
        }
    };

    let apk = apk_dir.join(&metadata.elements.first()?.output_file);
    if fs.is_file(&apk) {
        Some(apk)
    } else {
        warn!(?apk, "output metadata names a missing apk");
        None
    }
}
