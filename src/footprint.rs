// src/footprint.rs

//! Memory-footprint measurement of the packaged watch face.

use std::path::Path;

use tracing::{error, info};

use crate::errors::{Result, WffError};
use crate::exec::invoker::{InvocationResult, ToolInvocation, ToolInvoker};
use crate::fs::FileSystem;
use crate::manifest::resolve_version;
use crate::tools::ToolArtifact;
use crate::validate::OutputRecord;

/// Run the footprint tool on `apk` and write its output to the tool's record.
///
/// The record is written whatever the exit code; a non-zero exit then fails
/// with [`WffError::ToolFailed`].
pub async fn measure(
    fs: &dyn FileSystem,
    invoker: &dyn ToolInvoker,
    tool: &ToolArtifact,
    manifest: &Path,
    apk: &Path,
) -> Result<InvocationResult> {
    let version = resolve_version(fs, manifest)?;

    if !fs.is_file(&tool.jar_path) {
        return Err(WffError::ToolAcquisition {
            tool: tool.kind.to_string(),
            url: tool.url.clone(),
            reason: format!("{:?} is not in the cache", tool.jar_path),
        });
    }

    let invocation = ToolInvocation::footprint(&tool.jar_path, version, apk);
    info!(?apk, %version, "measuring memory footprint");
    let result = invoker.invoke(&invocation).await?;

    let mut record = OutputRecord::new();
    record.push(&result);
    fs.write(&tool.output_path, record.as_str().as_bytes())?;

    if !result.success() {
        error!(?apk, exit_code = result.exit_code, "memory footprint check failed");
        return Err(WffError::ToolFailed {
            tool: tool.kind.to_string(),
            exit_code: result.exit_code,
            detail: format!("see {:?}", tool.output_path),
        });
    }

    Ok(result)
}
