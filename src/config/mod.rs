// src/config/mod.rs

//! Configuration loading and validation for wffbuild.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: semantic checks (`RawConfigFile` -> `ConfigFile`).
//! - `layout.rs`: every concrete path and URL derived from a config + tag.

pub mod layout;
pub mod loader;
pub mod model;
pub mod validate;

pub use layout::ProjectLayout;
pub use loader::{load_and_validate, load_from_path, project_dir_for};
pub use model::{
    ConfigFile, DeviceSection, ProjectSection, RawConfigFile, TaskConfig, ToolsSection,
    WatchSection, DEFAULT_RELEASE_BASE_URL, DEFAULT_RELEASE_TAG,
};
