// src/dag/binder.rs

//! Two-phase construction of the task graph.
//!
//! Phase 1 registers every task (built-ins first, then the configured ones).
//! Phase 2 wires edges, and may only reference tasks that were registered in
//! phase 1. Packaging tasks come from configuration, so the fixed ordering
//! between validation, packaging and the packaged-artifact consumers can only
//! be bound once registration is over.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::config::model::ConfigFile;
use crate::dag::graph::TaskGraph;
use crate::dag::task_info::TaskAction;
use crate::errors::{Result, WffError};
use crate::tools::ToolKind;

pub const VALIDATE_TASK: &str = "validateWff";
pub const INSTALL_TASK: &str = "validateWffAndInstall";
pub const MEMORY_FOOTPRINT_TASK: &str = "memoryFootprint";
pub const DOWNLOAD_VALIDATOR_TASK: &str = "downloadWffValidator";
pub const DOWNLOAD_MEMORY_FOOTPRINT_TASK: &str = "downloadMemoryFootprint";

/// Packaging tasks, provided by configuration.
pub const ASSEMBLE_DEBUG_TASK: &str = "assembleDebug";
pub const BUNDLE_DEBUG_TASK: &str = "bundleDebug";

/// Names that configuration may not redefine.
pub const BUILTIN_TASKS: &[&str] = &[
    DOWNLOAD_VALIDATOR_TASK,
    DOWNLOAD_MEMORY_FOOTPRINT_TASK,
    VALIDATE_TASK,
    INSTALL_TASK,
    MEMORY_FOOTPRINT_TASK,
];

/// Ordering between validation, packaging and packaging consumers.
pub const FIXED_EDGES: [(&str, &str); 4] = [
    (VALIDATE_TASK, ASSEMBLE_DEBUG_TASK),
    (VALIDATE_TASK, BUNDLE_DEBUG_TASK),
    (ASSEMBLE_DEBUG_TASK, INSTALL_TASK),
    (ASSEMBLE_DEBUG_TASK, MEMORY_FOOTPRINT_TASK),
];

/// Phase 1: collects tasks. Edges can only be declared, not bound.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    graph: TaskGraph,
    declared: Vec<(String, String)>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, action: TaskAction) -> Result<()> {
        if self.graph.contains(name) {
            return Err(WffError::ConfigError(format!(
                "task '{name}' is registered twice"
            )));
        }
        debug!(task = name, %action, "registered task");
        self.graph.add_task(name, action);
        Ok(())
    }

    /// Register a task that consumes the output of `inputs`.
    pub fn register_with_inputs(
        &mut self,
        name: &str,
        action: TaskAction,
        inputs: &[&str],
    ) -> Result<()> {
        self.register(name, action)?;
        for input in inputs {
            self.declared.push((input.to_string(), name.to_string()));
        }
        Ok(())
    }

    /// Close registration. Declared input edges are bound first.
    pub fn into_binder(self) -> Result<TaskBinder> {
        let mut binder = TaskBinder { graph: self.graph };
        for (before, after) in &self.declared {
            binder.bind(before, after)?;
        }
        Ok(binder)
    }
}

/// Phase 2: binds edges between registered tasks.
#[derive(Debug)]
pub struct TaskBinder {
    graph: TaskGraph,
}

impl TaskBinder {
    /// Make `before` a prerequisite of `after`.
    pub fn bind(&mut self, before: &str, after: &str) -> Result<()> {
        for name in [before, after] {
            if !self.graph.contains(name) {
                return Err(WffError::TaskNotFound(name.to_string()));
            }
        }
        debug!(before, after, "bound task edge");
        self.graph.add_edge(before, after);
        Ok(())
    }

    /// Reject cycles and hand out the finished graph.
    pub fn finish(self) -> Result<TaskGraph> {
        check_acyclic(&self.graph)?;
        Ok(self.graph)
    }
}

/// Edge direction: prerequisite -> dependent.
fn check_acyclic(graph: &TaskGraph) -> Result<()> {
    let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();
    for name in graph.tasks() {
        g.add_node(name);
        for dep in graph.dependencies_of(name) {
            g.add_edge(dep, name, ());
        }
    }

    match toposort(&g, None) {
        Ok(_) => Ok(()),
        Err(cycle) => Err(WffError::DagCycle(format!(
            "cycle in task graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}

/// Register built-in and configured tasks, then bind every edge.
pub fn build_task_graph(cfg: &ConfigFile) -> Result<TaskGraph> {
    let mut registry = TaskRegistry::new();

    registry.register(
        DOWNLOAD_VALIDATOR_TASK,
        TaskAction::Download(ToolKind::Validator),
    )?;
    registry.register(
        DOWNLOAD_MEMORY_FOOTPRINT_TASK,
        TaskAction::Download(ToolKind::MemoryFootprint),
    )?;
    registry.register_with_inputs(VALIDATE_TASK, TaskAction::Validate, &[DOWNLOAD_VALIDATOR_TASK])?;
    registry.register(INSTALL_TASK, TaskAction::Install)?;
    registry.register_with_inputs(
        MEMORY_FOOTPRINT_TASK,
        TaskAction::Measure,
        &[DOWNLOAD_MEMORY_FOOTPRINT_TASK],
    )?;

    for (name, task) in cfg.tasks() {
        registry.register(name, TaskAction::Command(task.cmd.clone()))?;
    }

    let mut binder = registry.into_binder()?;

    for (name, task) in cfg.tasks() {
        for dep in &task.after {
            binder.bind(dep, name)?;
        }
    }
    for (before, after) in FIXED_EDGES {
        binder.bind(before, after)?;
    }

    binder.finish()
}
