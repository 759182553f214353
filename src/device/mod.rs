// src/device/mod.rs

//! Consumers of the packaged artifact: finding it and pushing it to a device.

pub mod apk;
pub mod install;

pub use apk::{resolve_apk, OUTPUT_METADATA_FILE};
pub use install::install_apk;
