use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use wffbuild::dag::ScheduledTask;
use wffbuild::errors::{Result, WffError};
use wffbuild::exec::TaskExecutor;

/// A fake executor that:
/// - records which tasks were "run", in order
/// - fails the tasks named in `failing` with `CommandFailed` (exit code 1)
/// - succeeds every other task immediately.
#[derive(Debug, Default)]
pub struct FakeTaskExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    failing: BTreeSet<String>,
}

impl FakeTaskExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, task: &str) -> Self {
        self.failing.insert(task.to_string());
        self
    }

    /// Shared handle to the execution log, usable after the executor moved.
    pub fn executed_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl TaskExecutor for FakeTaskExecutor {
    fn execute<'a>(
        &'a mut self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        self.executed.lock().unwrap().push(task.name.clone());
        let fail = self.failing.contains(&task.name);

        Box::pin(async move {
            if fail {
                Err(WffError::CommandFailed {
                    task: task.name.clone(),
                    exit_code: 1,
                })
            } else {
                Ok(())
            }
        })
    }
}
