// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, error, info};

use crate::dag::Scheduler;
use crate::errors::{Result, WffError};
use crate::exec::TaskExecutor;

use super::{RuntimeOptions, TaskName, TaskOutcome};

/// What happened to every task of a run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// In execution order.
    pub succeeded: Vec<TaskName>,
    /// Tasks that ran and failed, with their error, in execution order.
    pub failed: Vec<(TaskName, WffError)>,
    /// Tasks that never ran: blocked by a failure, or left over after
    /// stopping at the first failure.
    pub skipped: Vec<TaskName>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_tasks(&self) -> Vec<&str> {
        self.failed.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The first task error, if any; otherwise the report itself.
    pub fn into_result(mut self) -> Result<BuildReport> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            let (_, err) = self.failed.remove(0);
            Err(err)
        }
    }
}

/// Drives the scheduler and delegates execution to a `TaskExecutor`.
///
/// Tasks run strictly one after another.
pub struct Runtime<E: TaskExecutor> {
    scheduler: Scheduler,
    executor: E,
    options: RuntimeOptions,
}

impl<E: TaskExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: TaskExecutor> Runtime<E> {
    pub fn new(scheduler: Scheduler, executor: E, options: RuntimeOptions) -> Self {
        Self {
            scheduler,
            executor,
            options,
        }
    }

    /// Give back the executor, e.g. to inspect a fake after a run.
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Run `targets` and everything they depend on.
    ///
    /// Only an unknown target is an error here; task failures are collected
    /// in the report.
    pub async fn run(&mut self, targets: &[String]) -> Result<BuildReport> {
        self.scheduler.start_run(targets)?;
        info!(?targets, "build started");

        let mut report = BuildReport::default();

        while let Some(task) = self.scheduler.next_ready() {
            match self.executor.execute(&task).await {
                Ok(()) => {
                    self.scheduler.handle_completion(&task.name, TaskOutcome::Success);
                    report.succeeded.push(task.name);
                }
                Err(err) => {
                    error!(task = %task.name, error = %err, "task failed");
                    let blocked = self
                        .scheduler
                        .handle_completion(&task.name, TaskOutcome::Failed);
                    report.skipped.extend(blocked);
                    report.failed.push((task.name, err));

                    if !self.options.continue_on_failure {
                        debug!("stopping at first failure");
                        break;
                    }
                }
            }
        }

        report.skipped.extend(self.scheduler.pending_tasks());

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "build finished"
        );
        Ok(report)
    }
}
