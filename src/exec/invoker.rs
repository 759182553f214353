// src/exec/invoker.rs

//! Running one external tool jar against one target file.
//!
//! The invoker only reports: a non-zero exit is an ordinary
//! [`InvocationResult`], and deciding pass/fail is left to the caller. Only a
//! process that cannot be started at all is an error.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::process::Command;

use crate::errors::Result;
use crate::exec::process::run_captured;
use crate::manifest::ToolVersion;

/// Flag telling the validator to abort at the first problem in a file.
pub const STOP_ON_FAIL: &str = "--stop-on-fail";

/// A fully-built tool command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Jar to execute.
    pub tool: PathBuf,
    /// The file this invocation is about, absolute.
    pub target: PathBuf,
    pub args: Vec<String>,
}

impl ToolInvocation {
    /// `<version> --stop-on-fail <absolute file>`
    pub fn validate(tool: &Path, version: ToolVersion, file: &Path) -> Self {
        let target = absolutize(file);
        Self {
            tool: tool.to_path_buf(),
            args: vec![
                version.to_string(),
                STOP_ON_FAIL.to_string(),
                target.to_string_lossy().into_owned(),
            ],
            target,
        }
    }

    /// `--schema-version <version> --watch-face <absolute apk>`
    pub fn footprint(tool: &Path, version: ToolVersion, apk: &Path) -> Self {
        let target = absolutize(apk);
        Self {
            tool: tool.to_path_buf(),
            args: vec![
                "--schema-version".to_string(),
                version.to_string(),
                "--watch-face".to_string(),
                target.to_string_lossy().into_owned(),
            ],
            target,
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Outcome of one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub target: PathBuf,
    pub exit_code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait abstracting how tool jars are executed.
///
/// Production code uses [`JavaToolInvoker`]; tests record invocations
/// instead of spawning a JVM.
pub trait ToolInvoker: Send + Sync {
    fn invoke<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult>> + Send + 'a>>;
}

/// Executes `<java> -jar <tool> <args...>`.
#[derive(Debug, Clone)]
pub struct JavaToolInvoker {
    java: String,
}

impl JavaToolInvoker {
    pub fn new(java: impl Into<String>) -> Self {
        Self { java: java.into() }
    }

    fn command(&self, invocation: &ToolInvocation) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar").arg(&invocation.tool).args(&invocation.args);
        cmd
    }
}

impl Default for JavaToolInvoker {
    fn default() -> Self {
        Self::new("java")
    }
}

impl ToolInvoker for JavaToolInvoker {
    fn invoke<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult>> + Send + 'a>> {
        Box::pin(async move {
            let label = invocation.target.display().to_string();
            let out = run_captured(self.command(invocation), &label, None).await?;
            Ok(InvocationResult {
                target: invocation.target.clone(),
                exit_code: out.exit_code,
                output: out.combined(),
            })
        })
    }
}
