// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::dag::binder::VALIDATE_TASK;

/// Command-line arguments for `wffbuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wffbuild",
    version,
    about = "Validate watch face resources and drive packaging, install and memory measurement.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run. Their prerequisites run first.
    #[arg(value_name = "TASK", default_value = VALIDATE_TASK)]
    pub tasks: Vec<String>,

    /// Path to the project config file (TOML).
    ///
    /// The directory containing it is the project directory.
    #[arg(long, value_name = "PATH", default_value = "Wffbuild.toml")]
    pub config: String,

    /// Release tag of the external tools (e.g. `release`, `latest`).
    ///
    /// Overrides `[tools].release` from the config file.
    #[arg(long, value_name = "TAG")]
    pub release: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WFFBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the task graph and the execution plan, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep running tasks that don't depend on a failed task.
    #[arg(long = "continue")]
    pub continue_on_failure: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
