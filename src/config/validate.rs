// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::dag::binder::BUILTIN_TASKS;
use crate::errors::{Result, WffError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = WffError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_section(cfg)?;
    if let Some(tag) = cfg.tools.release.as_deref() {
        validate_release_tag(tag)?;
    }
    validate_tasks(cfg)?;
    validate_task_dependencies(cfg)?;
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.extension.trim().is_empty() {
        return Err(WffError::ConfigError(
            "[watch].extension must not be empty".to_string(),
        ));
    }
    if cfg.watch.dir_prefix.trim().is_empty() {
        return Err(WffError::ConfigError(
            "[watch].dir_prefix must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A release tag ends up in cache paths, so it must be a single path segment.
pub fn validate_release_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(WffError::ConfigError(
            "release tag must not be empty".to_string(),
        ));
    }
    if tag.contains('/') || tag.contains('\\') || tag.contains("..") {
        return Err(WffError::ConfigError(format!(
            "release tag '{tag}' must not contain path separators or '..'"
        )));
    }
    Ok(())
}

fn validate_tasks(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if BUILTIN_TASKS.contains(&name.as_str()) {
            return Err(WffError::ConfigError(format!(
                "task '{}' is built in and cannot be redefined in [task.{}]",
                name, name
            )));
        }
        if task.cmd.trim().is_empty() {
            return Err(WffError::ConfigError(format!(
                "task '{}' has an empty `cmd`",
                name
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if dep == name {
                return Err(WffError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.task.contains_key(dep) && !BUILTIN_TASKS.contains(&dep.as_str()) {
                return Err(WffError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}
