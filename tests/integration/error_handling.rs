// tests/integration/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use wffbuild::config::load_and_validate;
use wffbuild::dag::build_task_graph;
use wffbuild::errors::WffError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn cycle_through_builtin_tasks_returns_dag_cycle() {
    let file = config_file(
        r#"
[task.assembleDebug]
cmd = "./gradlew assembleDebug"
after = ["validateWffAndInstall"]

[task.bundleDebug]
cmd = "./gradlew bundleDebug"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    match build_task_graph(&cfg) {
        Err(WffError::DagCycle(msg)) => assert!(msg.contains("cycle")),
        other => panic!("Expected DagCycle error, got: {:?}", other),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = config_file(
        r#"
[task.assembleDebug]
cmd = "./gradlew assembleDebug"
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WffError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn missing_packaging_task_returns_task_not_found() {
    let file = config_file(
        r#"
[task.assembleDebug]
cmd = "./gradlew assembleDebug"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    match build_task_graph(&cfg) {
        Err(WffError::TaskNotFound(name)) => assert_eq!(name, "bundleDebug"),
        other => panic!("Expected TaskNotFound, got: {:?}", other),
    }
}

#[test]
fn invalid_toml_returns_toml_error() {
    let file = config_file("[task.assembleDebug\ncmd = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(WffError::TomlError(_))
    ));
}

#[test]
fn missing_file_returns_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/here/Wffbuild.toml"),
        Err(WffError::IoError(_))
    ));
}

#[test]
fn path_like_release_tag_is_rejected() {
    let file = config_file(
        r#"
[tools]
release = "../../etc"
"#,
    );
    assert!(matches!(
        load_and_validate(file.path()),
        Err(WffError::ConfigError(_))
    ));
}

#[test]
fn full_config_round_trips_into_sections() {
    let file = config_file(
        r#"
[project]
res_dir = "app/src/main/res"
manifest = "app/build/AndroidManifest.xml"
build_dir = "app/build"
apk_dir = "app/build/outputs/apk/debug"

[watch]
extension = "xml"
dir_prefix = "raw"

[tools]
release = "latest"
java = "/opt/jdk/bin/java"

[device]
adb = "/opt/sdk/platform-tools/adb"

[task.assembleDebug]
cmd = "./gradlew assembleDebug"

[task.bundleDebug]
cmd = "./gradlew bundleDebug"
after = ["assembleDebug"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.project().res_dir, "app/src/main/res");
    assert_eq!(cfg.tools().effective_release(None), "latest");
    assert_eq!(cfg.tools().effective_release(Some("v2")), "v2");
    assert_eq!(cfg.tools().java, "/opt/jdk/bin/java");
    assert_eq!(cfg.device().adb, "/opt/sdk/platform-tools/adb");
    assert_eq!(cfg.tasks()["bundleDebug"].after, vec!["assembleDebug"]);

    let graph = build_task_graph(&cfg).unwrap();
    assert!(graph.has_edge("assembleDebug", "bundleDebug"));
    assert!(graph.has_edge("validateWff", "bundleDebug"));
}
