// src/exec/backend.rs

//! Pluggable task executor abstraction.
//!
//! The runtime talks to a `TaskExecutor` instead of performing actions
//! itself, so tests can swap in a fake that records which tasks ran.
//!
//! - `ActionExecutor` is the implementation used by `wffbuild`. It maps each
//!   [`TaskAction`] onto downloads, validation, shell commands, device
//!   install and footprint measurement.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::changes::{FileFingerprintStore, WatchedFilePredicate};
use crate::config::{ConfigFile, ProjectLayout};
use crate::dag::{ScheduledTask, TaskAction};
use crate::device::{install_apk, resolve_apk};
use crate::errors::{Result, WffError};
use crate::exec::invoker::{JavaToolInvoker, ToolInvoker};
use crate::exec::process::{run_captured, shell_command};
use crate::footprint::measure;
use crate::fs::{FileSystem, RealFileSystem};
use crate::tools::{ensure_artifact, ArtifactSource, HttpArtifactSource};
use crate::validate::{ValidationRequest, ValidationRunner};

/// Trait abstracting how scheduled tasks are executed.
///
/// `Ok(())` means the task succeeded; any error fails it.
pub trait TaskExecutor: Send {
    fn execute<'a>(
        &'a mut self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Executor used in production.
pub struct ActionExecutor {
    layout: ProjectLayout,
    adb: String,
    fs: Arc<dyn FileSystem>,
    invoker: Arc<dyn ToolInvoker>,
    source: Arc<dyn ArtifactSource>,
    predicate: WatchedFilePredicate,
}

impl ActionExecutor {
    pub fn new(cfg: &ConfigFile, layout: ProjectLayout) -> Self {
        Self {
            layout,
            adb: cfg.device().adb.clone(),
            fs: Arc::new(RealFileSystem),
            invoker: Arc::new(JavaToolInvoker::new(cfg.tools().java.clone())),
            source: Arc::new(HttpArtifactSource::new()),
            predicate: WatchedFilePredicate::from_config(cfg.watch()),
        }
    }

    pub fn with_invoker(mut self, invoker: Arc<dyn ToolInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn with_source(mut self, source: Arc<dyn ArtifactSource>) -> Self {
        self.source = source;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    async fn run_action(&self, name: &str, action: &TaskAction) -> Result<()> {
        match action {
            TaskAction::Download(kind) => {
                ensure_artifact(self.source.as_ref(), self.layout.artifact(*kind)).await?;
            }
            TaskAction::Validate => {
                let outcome = self.validate().await?;
                info!(
                    task = name,
                    version = %outcome.version,
                    processed = outcome.processed.len(),
                    incremental = outcome.incremental,
                    record = ?outcome.record,
                    "validation finished"
                );
            }
            TaskAction::Command(cmd) => {
                self.run_command(name, cmd).await?;
            }
            TaskAction::Install => {
                let apk = resolve_apk(self.fs.as_ref(), &self.layout.apk_dir)?;
                install_apk(&self.adb, &apk).await?;
            }
            TaskAction::Measure => {
                let apk = resolve_apk(self.fs.as_ref(), &self.layout.apk_dir)?;
                measure(
                    self.fs.as_ref(),
                    self.invoker.as_ref(),
                    &self.layout.footprint,
                    &self.layout.manifest,
                    &apk,
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn validate(&self) -> Result<crate::validate::RunOutcome> {
        let runner = ValidationRunner::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.invoker),
            self.predicate.clone(),
        );
        let request = ValidationRequest {
            root: self.layout.res_dir.clone(),
            manifest: self.layout.manifest.clone(),
            tool: self.layout.validator.jar_path.clone(),
            record: self.layout.validator.output_path.clone(),
        };
        let mut store =
            FileFingerprintStore::new(Arc::clone(&self.fs), self.layout.validation_state_path());
        runner.run(&request, &mut store).await
    }

    async fn run_command(&self, name: &str, cmd: &str) -> Result<()> {
        let project_dir: &Path = &self.layout.project_dir;
        let output = run_captured(shell_command(cmd), name, Some(project_dir)).await?;

        for line in output.stdout.lines() {
            info!(task = name, "{}", line);
        }

        if !output.success() {
            error!(task = name, exit_code = output.exit_code, stderr = %output.stderr.trim_end(), "command failed");
            return Err(WffError::CommandFailed {
                task: name.to_string(),
                exit_code: output.exit_code,
            });
        }
        Ok(())
    }
}

impl TaskExecutor for ActionExecutor {
    fn execute<'a>(
        &'a mut self,
        task: &'a ScheduledTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            debug!(task = %task.name, action = %task.action, "executing");
            self.run_action(&task.name, &task.action).await
        })
    }
}
