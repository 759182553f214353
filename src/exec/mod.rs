// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`process`] spawns a child process and captures its output.
//! - [`invoker`] builds tool command lines and runs tool jars through the
//!   `ToolInvoker` trait.
//! - [`backend`] provides the `TaskExecutor` trait and the concrete
//!   `ActionExecutor` the runtime uses in production, which tests can replace
//!   with a fake implementation.

pub mod backend;
pub mod invoker;
pub mod process;

pub use backend::{ActionExecutor, TaskExecutor};
pub use invoker::{InvocationResult, JavaToolInvoker, ToolInvocation, ToolInvoker};
