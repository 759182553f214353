// src/exec/process.rs

//! Spawning a child process and capturing everything it prints.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Exit status plus captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// Build a shell command appropriate for the platform.
pub fn shell_command(script: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(script);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(script);
        c
    }
}

/// Run `cmd` to completion, capturing stdout and stderr.
///
/// The child is killed if the returned future is dropped (e.g. the whole
/// build is cancelled). There is no timeout.
pub async fn run_captured(mut cmd: Command, label: &str, cwd: Option<&Path>) -> Result<ProcessOutput> {
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(label, command = ?cmd.as_std(), "spawning process");

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning process for {label}"))?;

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for process of {label}"))?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stderr.lines() {
        debug!(label, "stderr: {}", line);
    }

    info!(
        label,
        exit_code,
        success = output.status.success(),
        "process exited"
    );

    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
    })
}
