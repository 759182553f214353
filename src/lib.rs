// src/lib.rs

pub mod changes;
pub mod cli;
pub mod config;
pub mod dag;
pub mod device;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod footprint;
pub mod fs;
pub mod logging;
pub mod manifest;
pub mod tools;
pub mod validate;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, project_dir_for, ProjectLayout};
use crate::dag::{build_task_graph, Scheduler, TaskGraph};
use crate::engine::{BuildReport, Runtime, RuntimeOptions};
use crate::errors::Result;
use crate::exec::ActionExecutor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and path/URL resolution for the release tag
/// - task registration and edge binding
/// - scheduler / runtime
/// - the production executor
pub async fn run(args: CliArgs) -> Result<BuildReport> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let project_dir = std::path::absolute(project_dir_for(&config_path))?;
    let layout = ProjectLayout::resolve(&cfg, &project_dir, args.release.as_deref())?;
    debug!(?project_dir, release = %layout.release, "resolved project layout");

    let graph = build_task_graph(&cfg)?;

    if args.dry_run {
        print_dry_run(&graph, &layout, &args.tasks)?;
        return Ok(BuildReport::default());
    }

    let executor = ActionExecutor::new(&cfg, layout);
    let options = RuntimeOptions {
        continue_on_failure: args.continue_on_failure,
    };
    let mut runtime = Runtime::new(Scheduler::new(graph), executor, options);

    let report = runtime.run(&args.tasks).await?.into_result()?;
    info!(tasks = ?report.succeeded, "all tasks succeeded");
    Ok(report)
}

/// Print the registered tasks, their prerequisites and the execution plan.
fn print_dry_run(graph: &TaskGraph, layout: &ProjectLayout, targets: &[String]) -> Result<()> {
    println!("wffbuild dry-run");
    println!("  project = {}", layout.project_dir.display());
    println!("  release = {}", layout.release);
    println!("  validator = {}", layout.validator.url);
    println!("  memory footprint = {}", layout.footprint.url);
    println!();

    println!("tasks:");
    for name in graph.tasks() {
        println!("  - {name}");
        if let Some(action) = graph.action_of(name) {
            println!("      action: {action}");
        }
        let deps: Vec<_> = graph.dependencies_of(name).collect();
        if !deps.is_empty() {
            println!("      after: {:?}", deps);
        }
    }
    println!();

    let plan = Scheduler::plan(graph, targets)?;
    println!("plan for {:?}:", targets);
    for (i, name) in plan.iter().enumerate() {
        println!("  {}. {name}", i + 1);
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
