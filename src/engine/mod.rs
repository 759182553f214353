// src/engine/mod.rs

//! Orchestration engine for wffbuild.
//!
//! This module ties together the task scheduler and the executor: the
//! [`runtime`] asks the scheduler for the next ready task, runs it through a
//! [`crate::exec::TaskExecutor`] and feeds the outcome back, one task at a
//! time.

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of a task for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

/// Runtime options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// Keep running tasks that don't depend on a failed one.
    pub continue_on_failure: bool,
}

pub mod runtime;

pub use runtime::{BuildReport, Runtime};
