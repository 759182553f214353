// tests/integration/fs_abstraction.rs

use std::path::Path;
use std::sync::Arc;

use wffbuild::changes::{FingerprintStore, MemoryFingerprintStore, WatchedFilePredicate};
use wffbuild::fs::mock::MockFileSystem;
use wffbuild::validate::{ValidationRequest, ValidationRunner};
use wffbuild_test_utils::builders::manifest_xml;
use wffbuild_test_utils::fake_invoker::FakeToolInvoker;

fn request() -> ValidationRequest {
    ValidationRequest {
        root: "/p/res".into(),
        manifest: "/p/AndroidManifest.xml".into(),
        tool: "/p/build/validator/validator-release.jar".into(),
        record: "/p/build/validator/validator-release.txt".into(),
    }
}

fn project() -> Arc<MockFileSystem> {
    let fs = MockFileSystem::new();
    fs.add_file("/p/AndroidManifest.xml", manifest_xml(1));
    fs.add_file("/p/build/validator/validator-release.jar", b"jar".to_vec());
    Arc::new(fs)
}

#[tokio::test]
async fn runner_works_entirely_in_memory() {
    let fs = project();
    fs.add_file("/p/res/raw/face.xml", b"<WatchFace/>".to_vec());
    fs.add_file("/p/res/raw/bad_hands.xml", b"<WatchFace>".to_vec());

    let invoker = FakeToolInvoker::new();
    let runner = ValidationRunner::new(
        fs.clone(),
        Arc::new(invoker.clone()),
        WatchedFilePredicate::default(),
    );
    let mut store = MemoryFingerprintStore::new();

    let err = runner.run(&request(), &mut store).await.unwrap_err();
    assert!(err.to_string().contains("bad_hands.xml"));
    assert_eq!(invoker.invoked_files(), vec!["bad_hands.xml", "face.xml"]);

    let record = fs
        .contents("/p/build/validator/validator-release.txt")
        .map(|b| String::from_utf8(b).unwrap())
        .unwrap();
    assert!(record.starts_with("==> /p/res/raw/bad_hands.xml (exit 1)\n"));

    let state = store.load().unwrap();
    assert!(state.files.contains_key("raw/face.xml"));
    assert!(!state.files.contains_key("raw/bad_hands.xml"));
}

#[tokio::test]
async fn empty_tree_writes_empty_record() {
    let fs = project();
    let invoker = FakeToolInvoker::new();
    let runner = ValidationRunner::new(
        fs.clone(),
        Arc::new(invoker.clone()),
        WatchedFilePredicate::default(),
    );

    let outcome = runner
        .run(&request(), &mut MemoryFingerprintStore::new())
        .await
        .unwrap();

    assert!(outcome.processed.is_empty());
    assert_eq!(
        fs.contents(Path::new("/p/build/validator/validator-release.txt")),
        Some(Vec::new())
    );
}
