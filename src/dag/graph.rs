// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::dag::task_info::TaskAction;
use crate::engine::TaskName;
use crate::errors::{Result, WffError};

/// Internal node structure: the action plus immediate neighbours.
#[derive(Debug, Clone)]
struct TaskNode {
    action: TaskAction,
    /// Tasks that must succeed before this one can run.
    deps: BTreeSet<TaskName>,
    /// Tasks that list this one as a prerequisite.
    dependents: BTreeSet<TaskName>,
}

/// Prerequisite graph keyed by task name.
///
/// Built only through [`crate::dag::TaskRegistry`], which checks for cycles,
/// so every `TaskGraph` is acyclic and every edge endpoint exists.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    nodes: BTreeMap<TaskName, TaskNode>,
}

impl TaskGraph {
    pub(crate) fn add_task(&mut self, name: &str, action: TaskAction) {
        self.nodes.insert(
            name.to_string(),
            TaskNode {
                action,
                deps: BTreeSet::new(),
                dependents: BTreeSet::new(),
            },
        );
    }

    /// Add `before → after`. Both ends must already exist.
    pub(crate) fn add_edge(&mut self, before: &str, after: &str) {
        if let Some(node) = self.nodes.get_mut(after) {
            node.deps.insert(before.to_string());
        }
        if let Some(node) = self.nodes.get_mut(before) {
            node.dependents.insert(after.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// All task names, sorted.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn action_of(&self, name: &str) -> Option<&TaskAction> {
        self.nodes.get(name).map(|n| &n.action)
    }

    /// Immediate prerequisites of a task.
    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(name)
            .into_iter()
            .flat_map(|n| n.deps.iter().map(|s| s.as_str()))
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(name)
            .into_iter()
            .flat_map(|n| n.dependents.iter().map(|s| s.as_str()))
    }

    /// Whether `before → after` is a direct edge.
    pub fn has_edge(&self, before: &str, after: &str) -> bool {
        self.nodes
            .get(after)
            .is_some_and(|n| n.deps.contains(before))
    }

    /// The targets plus everything they transitively depend on.
    pub fn prerequisite_closure(&self, targets: &[String]) -> Result<BTreeSet<TaskName>> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<&str> = Vec::new();

        for target in targets {
            if !self.contains(target) {
                return Err(WffError::TaskNotFound(target.clone()));
            }
            stack.push(target.as_str());
        }

        while let Some(name) = stack.pop() {
            if !closure.insert(name.to_string()) {
                continue;
            }
            stack.extend(self.dependencies_of(name));
        }

        Ok(closure)
    }
}
