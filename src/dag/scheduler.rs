use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::task_info::{RunState, ScheduledTask, TaskRunState};
use crate::engine::{TaskName, TaskOutcome};
use crate::errors::Result;

/// Scheduler holds the immutable task graph plus mutable per-run state.
///
/// It is responsible for:
/// - pulling the prerequisites of the requested targets into the run
/// - handing out one ready task at a time, in name order
/// - failing every dependent of a task that failed
#[derive(Debug, Clone)]
pub struct Scheduler {
    graph: TaskGraph,
    states: BTreeMap<TaskName, RunState>,
}

impl Scheduler {
    pub fn new(graph: TaskGraph) -> Self {
        Self {
            graph,
            states: BTreeMap::new(),
        }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Reset per-run state and mark `targets` plus their prerequisites Pending.
    pub fn start_run(&mut self, targets: &[String]) -> Result<()> {
        let closure = self.graph.prerequisite_closure(targets)?;
        self.states = closure
            .into_iter()
            .map(|name| (name, RunState::Pending))
            .collect();
        debug!(?targets, tasks = self.states.len(), "scheduler: starting run");
        Ok(())
    }

    /// The lexicographically smallest Pending task whose prerequisites have
    /// all succeeded, now marked Running.
    pub fn next_ready(&mut self) -> Option<ScheduledTask> {
        let name = self
            .states
            .iter()
            .filter(|(_, state)| **state == RunState::Pending)
            .map(|(name, _)| name)
            .find(|name| self.deps_satisfied(name))?
            .clone();

        let action = self.graph.action_of(&name)?.clone();
        self.states.insert(name.clone(), RunState::Running);
        info!(task = %name, %action, "running task");
        Some(ScheduledTask { name, action })
    }

    /// Record the outcome of a running task.
    ///
    /// Returns the dependents newly failed because of it.
    pub fn handle_completion(&mut self, task: &str, outcome: TaskOutcome) -> Vec<TaskName> {
        match self.states.get(task) {
            Some(RunState::Running) => {}
            other => {
                warn!(task, state = ?other, "completion for a task that is not running; ignoring");
                return Vec::new();
            }
        }

        match outcome {
            TaskOutcome::Success => {
                self.states.insert(task.to_string(), RunState::DoneSuccess);
                debug!(task, "task completed successfully");
                Vec::new()
            }
            TaskOutcome::Failed => {
                self.states.insert(task.to_string(), RunState::DoneFailed);
                let failed = self.mark_dependents_failed(task);
                if !failed.is_empty() {
                    warn!(task, dependents = ?failed, "task failed; its dependents will not run");
                }
                failed
            }
        }
    }

    pub fn run_state_of(&self, task: &str) -> TaskRunState {
        self.states.get(task).copied().into()
    }

    /// Tasks of the current run still waiting, in name order.
    pub fn pending_tasks(&self) -> Vec<TaskName> {
        self.states
            .iter()
            .filter(|(_, state)| **state == RunState::Pending)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Execution order for `targets` if every task succeeds.
    pub fn plan(graph: &TaskGraph, targets: &[String]) -> Result<Vec<TaskName>> {
        let mut scheduler = Scheduler::new(graph.clone());
        scheduler.start_run(targets)?;

        let mut order = Vec::new();
        while let Some(task) = scheduler.next_ready() {
            scheduler.handle_completion(&task.name, TaskOutcome::Success);
            order.push(task.name);
        }
        Ok(order)
    }

    fn deps_satisfied(&self, task: &str) -> bool {
        self.graph
            .dependencies_of(task)
            .all(|dep| self.states.get(dep) == Some(&RunState::DoneSuccess))
    }

    /// Mark every transitive dependent in this run as failed.
    fn mark_dependents_failed(&mut self, failed_task: &str) -> Vec<TaskName> {
        let mut stack: Vec<TaskName> = self
            .graph
            .dependents_of(failed_task)
            .map(str::to_string)
            .collect();
        let mut newly_failed = Vec::new();

        while let Some(name) = stack.pop() {
            if let Some(state) = self.states.get_mut(&name) {
                if *state == RunState::Pending {
                    *state = RunState::DoneFailed;
                    newly_failed.push(name.clone());
                    stack.extend(self.graph.dependents_of(&name).map(str::to_string));
                }
            }
        }

        newly_failed.sort();
        newly_failed
    }
}
