// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Release tag used when neither the CLI nor the config names one.
pub const DEFAULT_RELEASE_TAG: &str = "release";

/// Where the published tool jars live; `<base_url>/<tag>/<artifact>`.
pub const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/google/watchface/releases/download";

/// Top-level configuration as read from a TOML file (`Wffbuild.toml`).
///
/// ```toml
/// [project]
/// res_dir = "src/main/res"
///
/// [tools]
/// release = "latest"
///
/// [task.assembleDebug]
/// cmd = "./gradlew assembleDebug"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw,
/// unvalidated shape; use [`ConfigFile`] everywhere else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub tools: ToolsSection,

    #[serde(default)]
    pub device: DeviceSection,

    /// Host tasks from `[task.<name>]`, e.g. `assembleDebug`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    project: ProjectSection,
    watch: WatchSection,
    tools: ToolsSection,
    device: DeviceSection,
    task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            project: raw.project,
            watch: raw.watch,
            tools: raw.tools,
            device: raw.device,
            task: raw.task,
        }
    }

    pub fn project(&self) -> &ProjectSection {
        &self.project
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn tools(&self) -> &ToolsSection {
        &self.tools
    }

    pub fn device(&self) -> &DeviceSection {
        &self.device
    }

    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }
}

/// `[project]` section. Paths are relative to the project directory.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Root of the watched resource tree.
    #[serde(default = "default_res_dir")]
    pub res_dir: String,

    /// Merged manifest carrying the watch face format version.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Tool cache, output records and fingerprint state live here.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Directory the packaging step writes the APK (and its metadata) into.
    #[serde(default = "default_apk_dir")]
    pub apk_dir: String,
}

fn default_res_dir() -> String {
    "src/main/res".to_string()
}

fn default_manifest() -> String {
    "build/intermediates/merged_manifest/debug/AndroidManifest.xml".to_string()
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_apk_dir() -> String {
    "build/outputs/apk/debug".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            res_dir: default_res_dir(),
            manifest: default_manifest(),
            build_dir: default_build_dir(),
            apk_dir: default_apk_dir(),
        }
    }
}

/// `[watch]` section: which files under `res_dir` are validated.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// File extension without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Required prefix of the immediate parent directory name.
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,
}

fn default_extension() -> String {
    "xml".to_string()
}

fn default_dir_prefix() -> String {
    "raw".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            dir_prefix: default_dir_prefix(),
        }
    }
}

/// `[tools]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    /// Release tag; `None` falls back to [`DEFAULT_RELEASE_TAG`].
    #[serde(default)]
    pub release: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Launcher for the tool jars.
    #[serde(default = "default_java")]
    pub java: String,
}

fn default_base_url() -> String {
    DEFAULT_RELEASE_BASE_URL.to_string()
}

fn default_java() -> String {
    "java".to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            release: None,
            base_url: default_base_url(),
            java: default_java(),
        }
    }
}

impl ToolsSection {
    /// Effective release tag: explicit override, then config, then default.
    pub fn effective_release(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| self.release.clone())
            .unwrap_or_else(|| DEFAULT_RELEASE_TAG.to_string())
    }
}

/// `[device]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSection {
    #[serde(default = "default_adb")]
    pub adb: String,
}

fn default_adb() -> String {
    "adb".to_string()
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self { adb: default_adb() }
    }
}

/// `[task.<name>]` section: a host step run as a shell command.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// The command to execute.
    pub cmd: String,

    /// Extra prerequisites of this task, by task name.
    #[serde(default)]
    pub after: Vec<String>,
}
