// src/config/layout.rs

use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_release_tag;
use crate::errors::Result;
use crate::tools::{ToolArtifact, ToolKind};

/// Every concrete location a build needs, resolved once per invocation.
///
/// The release tag is folded in here so that nothing downstream formats a
/// tag-qualified path or URL on its own.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub project_dir: PathBuf,
    pub res_dir: PathBuf,
    pub manifest: PathBuf,
    pub build_dir: PathBuf,
    pub apk_dir: PathBuf,
    pub release: String,
    pub validator: ToolArtifact,
    pub footprint: ToolArtifact,
}

impl ProjectLayout {
    pub fn resolve(
        cfg: &ConfigFile,
        project_dir: &Path,
        release_override: Option<&str>,
    ) -> Result<Self> {
        let release = cfg.tools().effective_release(release_override);
        validate_release_tag(&release)?;

        let project = cfg.project();
        let build_dir = project_dir.join(&project.build_dir);
        let base_url = cfg.tools().base_url.as_str();

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            res_dir: project_dir.join(&project.res_dir),
            manifest: project_dir.join(&project.manifest),
            apk_dir: project_dir.join(&project.apk_dir),
            validator: ToolArtifact::new(ToolKind::Validator, base_url, &release, &build_dir),
            footprint: ToolArtifact::new(ToolKind::MemoryFootprint, base_url, &release, &build_dir),
            build_dir,
            release,
        })
    }

    pub fn artifact(&self, kind: ToolKind) -> &ToolArtifact {
        match kind {
            ToolKind::Validator => &self.validator,
            ToolKind::MemoryFootprint => &self.footprint,
        }
    }

    /// Sidecar file holding the fingerprints of the last validation run.
    pub fn validation_state_path(&self) -> PathBuf {
        self.validator.sibling("state")
    }
}
