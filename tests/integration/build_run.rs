// tests/integration/build_run.rs

use wffbuild::cli::CliArgs;
use wffbuild::errors::WffError;

use clap::Parser;

fn write_config(dir: &std::path::Path, contents: &str) -> String {
    let path = dir.join("Wffbuild.toml");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

const PACKAGING: &str = r#"
[task.assembleDebug]
cmd = "true"

[task.bundleDebug]
cmd = "true"
"#;

#[tokio::test]
async fn dry_run_executes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), PACKAGING);

    let args = CliArgs::parse_from([
        "wffbuild",
        "--config",
        &config,
        "--dry-run",
        "validateWffAndInstall",
    ]);
    let report = wffbuild::run(args).await.unwrap();

    assert!(report.succeeded.is_empty());
    assert!(!dir.path().join("build").exists());
}

#[tokio::test]
async fn unknown_task_fails_before_running_anything() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), PACKAGING);

    let args = CliArgs::parse_from(["wffbuild", "--config", &config, "assembleRelease"]);
    let err = wffbuild::run(args).await.unwrap_err();

    assert!(matches!(err, WffError::TaskNotFound(name) if name == "assembleRelease"));
}

#[cfg(unix)]
#[tokio::test]
async fn configured_command_runs_in_project_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
[task.assembleDebug]
cmd = "true"

[task.bundleDebug]
cmd = "true"

[task.prepare]
cmd = "echo ready > prepared.txt"
"#,
    );

    let args = CliArgs::parse_from(["wffbuild", "--config", &config, "prepare"]);
    let report = wffbuild::run(args).await.unwrap();

    assert_eq!(report.succeeded, vec!["prepare"]);
    let written = std::fs::read_to_string(dir.path().join("prepared.txt")).unwrap();
    assert_eq!(written.trim(), "ready");
}

#[tokio::test]
async fn release_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), PACKAGING);

    let args = CliArgs::parse_from([
        "wffbuild",
        "--config",
        &config,
        "--release",
        "a/b",
        "--dry-run",
    ]);
    assert!(matches!(
        wffbuild::run(args).await,
        Err(WffError::ConfigError(_))
    ));
}
