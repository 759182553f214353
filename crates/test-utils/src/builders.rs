#![allow(dead_code)]

use wffbuild::config::{ConfigFile, RawConfigFile, TaskConfig};
use wffbuild::dag::binder::{ASSEMBLE_DEBUG_TASK, BUNDLE_DEBUG_TASK};
use wffbuild::manifest::FORMAT_VERSION_PROPERTY;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    /// Declare `assembleDebug` and `bundleDebug` with harmless commands.
    pub fn with_packaging_tasks(self) -> Self {
        self.with_task(ASSEMBLE_DEBUG_TASK, TaskConfigBuilder::new("true").build())
            .with_task(BUNDLE_DEBUG_TASK, TaskConfigBuilder::new("true").build())
    }

    pub fn with_release(mut self, tag: &str) -> Self {
        self.config.tools.release = Some(tag.to_string());
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.config.tools.base_url = url.to_string();
        self
    }

    pub fn with_res_dir(mut self, dir: &str) -> Self {
        self.config.project.res_dir = dir.to_string();
        self
    }

    pub fn with_manifest(mut self, path: &str) -> Self {
        self.config.project.manifest = path.to_string();
        self
    }

    pub fn with_watch(mut self, extension: &str, dir_prefix: &str) -> Self {
        self.config.watch.extension = extension.to_string();
        self.config.watch.dir_prefix = dir_prefix.to_string();
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

/// A minimal merged manifest declaring `version`.
pub fn manifest_xml(version: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.face">
    <application android:hasCode="false">
        <property android:name="{FORMAT_VERSION_PROPERTY}" android:value="{version}" />
    </application>
</manifest>
"#
    )
}
