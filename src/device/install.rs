// src/device/install.rs

use std::path::Path;

use tokio::process::Command;
use tracing::{error, info};

use crate::errors::{Result, WffError};
use crate::exec::process::run_captured;

/// `<adb> install <apk>` against whatever device adb picks.
pub async fn install_apk(adb: &str, apk: &Path) -> Result<()> {
    let mut cmd = Command::new(adb);
    cmd.arg("install").arg(apk);

    let output = run_captured(cmd, "adb install", None).await?;
    if !output.success() {
        let detail = output.combined().trim_end().to_string();
        error!(?apk, exit_code = output.exit_code, %detail, "install failed");
        return Err(WffError::ToolFailed {
            tool: adb.to_string(),
            exit_code: output.exit_code,
            detail,
        });
    }

    info!(?apk, "installed");
    Ok(())
}
