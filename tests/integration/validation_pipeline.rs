// tests/integration/validation_pipeline.rs

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use wffbuild::config::{ConfigFile, ProjectLayout};
use wffbuild::dag::binder::{ASSEMBLE_DEBUG_TASK, DOWNLOAD_VALIDATOR_TASK, VALIDATE_TASK};
use wffbuild::dag::{build_task_graph, Scheduler};
use wffbuild::engine::{Runtime, RuntimeOptions};
use wffbuild::errors::WffError;
use wffbuild::exec::ActionExecutor;
use wffbuild::tools::ArtifactSource;
use wffbuild_test_utils::builders::{manifest_xml, ConfigFileBuilder, TaskConfigBuilder};
use wffbuild_test_utils::fake_invoker::FakeToolInvoker;
use wffbuild_test_utils::with_timeout;

/// Serves the same jar bytes for every URL and remembers what was asked for.
#[derive(Default)]
struct JarServer {
    urls: Mutex<Vec<String>>,
}

impl ArtifactSource for JarServer {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send + 'a>> {
        self.urls.lock().unwrap().push(url.to_string());
        Box::pin(async move { Ok(b"validator jar".to_vec()) })
    }
}

fn config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_packaging_tasks()
        .with_task(ASSEMBLE_DEBUG_TASK, TaskConfigBuilder::new("touch packaged").build())
        .build()
}

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

struct Pipeline {
    runtime: Runtime<ActionExecutor>,
    invoker: FakeToolInvoker,
    server: Arc<JarServer>,
}

fn pipeline(dir: &Path, raw_files: &[&str]) -> Pipeline {
    let cfg = config();
    let layout = ProjectLayout::resolve(&cfg, dir, None).unwrap();
    let invoker = FakeToolInvoker::new();
    let server = Arc::new(JarServer::default());

    let executor = ActionExecutor::new(&cfg, layout)
        .with_invoker(Arc::new(invoker.clone()))
        .with_source(server.clone());

    write(&executor.layout().manifest, &manifest_xml(2));
    for name in raw_files {
        write(
            &executor.layout().res_dir.join("raw").join(name),
            "<WatchFace/>",
        );
    }

    let runtime = Runtime::new(
        Scheduler::new(build_task_graph(&cfg).unwrap()),
        executor,
        RuntimeOptions::default(),
    );
    Pipeline {
        runtime,
        invoker,
        server,
    }
}

#[cfg(unix)]
#[tokio::test]
async fn invalid_watch_face_stops_packaging() {
    let dir = tempfile::tempdir().unwrap();
    let Pipeline {
        mut runtime,
        invoker,
        server,
    } = pipeline(dir.path(), &["bad.xml"]);

    let report = with_timeout(runtime.run(&[ASSEMBLE_DEBUG_TASK.to_string()]))
        .await
        .unwrap();

    assert_eq!(report.succeeded, vec![DOWNLOAD_VALIDATOR_TASK]);
    assert_eq!(report.failed_tasks(), vec![VALIDATE_TASK]);
    assert!(report.skipped.iter().any(|s| s == ASSEMBLE_DEBUG_TASK));
    assert_eq!(server.urls.lock().unwrap().len(), 1);
    assert_eq!(invoker.invoked_files(), vec!["bad.xml"]);

    let err = report.into_result().unwrap_err();
    match &err {
        WffError::ValidationFailed { failures, .. } => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].file.ends_with("raw/bad.xml"));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("bad.xml"));
    assert!(!dir.path().join("packaged").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn valid_watch_face_is_packaged() {
    let dir = tempfile::tempdir().unwrap();
    let Pipeline {
        mut runtime,
        invoker,
        server,
    } = pipeline(dir.path(), &["face.xml"]);

    let report = with_timeout(runtime.run(&[ASSEMBLE_DEBUG_TASK.to_string()]))
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        report.succeeded,
        vec![DOWNLOAD_VALIDATOR_TASK, VALIDATE_TASK, ASSEMBLE_DEBUG_TASK]
    );
    assert_eq!(invoker.invoked_files(), vec!["face.xml"]);
    assert!(server.urls.lock().unwrap()[0].ends_with("/wff-validator.jar"));
    assert!(dir.path().join("packaged").is_file());
}
