// src/dag/task_info.rs

//! Task actions and per-run state.

use std::fmt;

use crate::engine::TaskName;
use crate::tools::ToolKind;

/// What executing a task actually does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Make sure a tool jar is cached.
    Download(ToolKind),
    /// Incremental validation of the watched resource files.
    Validate,
    /// A configured shell command (packaging steps).
    Command(String),
    /// Push the packaged APK to a device.
    Install,
    /// Run the memory-footprint tool on the packaged APK.
    Measure,
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAction::Download(kind) => write!(f, "download {kind}"),
            TaskAction::Validate => f.write_str("validate watched files"),
            TaskAction::Command(cmd) => write!(f, "run `{cmd}`"),
            TaskAction::Install => f.write_str("install apk"),
            TaskAction::Measure => f.write_str("measure memory footprint"),
        }
    }
}

/// Per-run state of a task (internal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Requested for this run, waiting on prerequisites.
    Pending,
    /// Handed to the executor.
    Running,
    DoneSuccess,
    /// Failed, or blocked by a failed prerequisite.
    DoneFailed,
}

/// Public, read-only view of a task's per-run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    /// The task is not part of the current run.
    NotInRun,
    Pending,
    Running,
    DoneSuccess,
    DoneFailed,
}

impl From<Option<RunState>> for TaskRunState {
    fn from(state: Option<RunState>) -> Self {
        match state {
            None => TaskRunState::NotInRun,
            Some(RunState::Pending) => TaskRunState::Pending,
            Some(RunState::Running) => TaskRunState::Running,
            Some(RunState::DoneSuccess) => TaskRunState::DoneSuccess,
            Some(RunState::DoneFailed) => TaskRunState::DoneFailed,
        }
    }
}

/// A task the scheduler wants executed now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub name: TaskName,
    pub action: TaskAction,
}
