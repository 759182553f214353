// src/dag/mod.rs

//! Task graph and scheduling.
//!
//! - [`binder`] registers built-in and configured tasks, then binds edges.
//! - [`graph`] holds the resulting acyclic prerequisite graph.
//! - [`scheduler`] contains the per-run state machine that decides which
//!   task is ready next and which tasks a failure rules out.
//! - [`task_info`] provides task actions and per-run state types.

pub mod binder;
pub mod graph;
pub mod scheduler;
pub mod task_info;

pub use binder::{build_task_graph, TaskBinder, TaskRegistry};
pub use graph::TaskGraph;
pub use scheduler::Scheduler;
pub use task_info::{ScheduledTask, TaskAction, TaskRunState};
