// src/validate/runner.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::changes::{
    compute_file_hash, resolve_changes, ChangeKind, FingerprintStore, RunState,
    WatchedFilePredicate,
};
use crate::errors::{InvocationFailure, Result, WffError};
use crate::exec::invoker::{InvocationResult, ToolInvocation, ToolInvoker};
use crate::fs::FileSystem;
use crate::manifest::{resolve_version, ToolVersion};
use crate::tools::ToolKind;
use crate::validate::record::OutputRecord;

/// Inputs of one validation run.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// Watched resource root.
    pub root: PathBuf,
    /// Manifest declaring the format version.
    pub manifest: PathBuf,
    /// Cached validator jar.
    pub tool: PathBuf,
    /// Output record, rewritten on every run.
    pub record: PathBuf,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub version: ToolVersion,
    /// False when the previous state was discarded.
    pub incremental: bool,
    /// One result per added or modified file, in processing order.
    pub processed: Vec<InvocationResult>,
    pub removed: Vec<PathBuf>,
    pub unchanged: usize,
    pub record: PathBuf,
}

/// Validates changed watched files, one tool process at a time.
pub struct ValidationRunner {
    fs: Arc<dyn FileSystem>,
    invoker: Arc<dyn ToolInvoker>,
    predicate: WatchedFilePredicate,
}

impl ValidationRunner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        invoker: Arc<dyn ToolInvoker>,
        predicate: WatchedFilePredicate,
    ) -> Self {
        Self {
            fs,
            invoker,
            predicate,
        }
    }

    /// Run the validator over every file added or modified since the state in
    /// `store` was saved.
    ///
    /// The record at `request.record` is rewritten even when nothing changed,
    /// when validation fails, and when the tool cannot be run at all. `store` is updated with the current
    /// fingerprints minus those of files that failed, so they are retried on
    /// the next run. Any failing file fails the whole run.
    pub async fn run(
        &self,
        request: &ValidationRequest,
        store: &mut dyn FingerprintStore,
    ) -> Result<RunOutcome> {
        let fs = self.fs.as_ref();

        let version = resolve_version(fs, &request.manifest)?;

        if !fs.is_file(&request.tool) {
            return Err(WffError::ToolAcquisition {
                tool: ToolKind::Validator.to_string(),
                url: request.tool.display().to_string(),
                reason: "validator jar is not in the cache".to_string(),
            });
        }
        let tool_hash = compute_file_hash(fs, &request.tool)?;

        let previous = store.load()?;
        let full_reason = full_rebuild_reason(&previous, &tool_hash, version, fs.exists(&request.record));

        let mut changes = resolve_changes(fs, &request.root, &self.predicate, &previous.files)?;
        if let Some(reason) = full_reason {
            info!(reason, "validating all watched files");
            changes = changes.into_full_rebuild();
        }

        let mut record = OutputRecord::new();
        let mut processed = Vec::new();
        let mut failures = Vec::new();
        let mut failed_keys = BTreeSet::new();

        for change in changes.to_process() {
            let invocation = ToolInvocation::validate(&request.tool, version, &change.file.path);
            info!(file = %change.file.rel_path, kind = %change.kind, %version, "validating");

            let result = match self.invoker.invoke(&invocation).await {
                Ok(result) => result,
                Err(err) => {
                    // The record still reflects only this run, up to the file that broke.
                    if let Err(write_err) = fs.write(&request.record, record.as_str().as_bytes()) {
                        error!(record = ?request.record, error = %write_err, "could not write partial record");
                    }
                    return Err(err);
                }
            };
            record.push(&result);

            if !result.success() {
                error!(
                    file = %change.file.rel_path,
                    exit_code = result.exit_code,
                    output = %result.output.trim_end(),
                    "validation failed"
                );
                failures.push(InvocationFailure {
                    file: result.target.clone(),
                    exit_code: result.exit_code,
                });
                failed_keys.insert(change.file.rel_path.clone());
            }
            processed.push(result);
        }

        let removed: Vec<PathBuf> = changes
            .removed()
            .map(|c| {
                debug!(file = %c.file.rel_path, "watched file removed; nothing to validate");
                c.file.path.clone()
            })
            .collect();

        fs.write(&request.record, record.as_str().as_bytes())?;
        debug!(record = ?request.record, entries = record.entries(), "wrote validation record");

        let mut files = changes.current_fingerprints();
        files.retain(|key, _| !failed_keys.contains(key));
        store.save(&RunState {
            tool: Some(tool_hash),
            version: Some(version),
            files,
        })?;

        if !failures.is_empty() {
            return Err(WffError::ValidationFailed {
                failures,
                record: request.record.clone(),
            });
        }

        info!(
            processed = processed.len(),
            removed = removed.len(),
            unchanged = changes.count(ChangeKind::Unchanged),
            "validation passed"
        );

        Ok(RunOutcome {
            version,
            incremental: full_reason.is_none(),
            unchanged: changes.count(ChangeKind::Unchanged),
            processed,
            removed,
            record: request.record.clone(),
        })
    }
}

/// Why the previous state can't be used, if it can't.
fn full_rebuild_reason(
    previous: &RunState,
    tool_hash: &str,
    version: ToolVersion,
    record_exists: bool,
) -> Option<&'static str> {
    if previous.tool.is_none() {
        Some("no previous run")
    } else if previous.tool.as_deref() != Some(tool_hash) {
        Some("validator changed")
    } else if previous.version != Some(version) {
        Some("format version changed")
    } else if !record_exists {
        Some("output record missing")
    } else {
        None
    }
}
