#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use wffbuild::changes::{FileFingerprintStore, WatchedFilePredicate};
use wffbuild::config::ProjectLayout;
use wffbuild::fs::RealFileSystem;
use wffbuild::validate::{ValidationRequest, ValidationRunner};
use wffbuild_test_utils::builders::{manifest_xml, ConfigFileBuilder};
use wffbuild_test_utils::fake_invoker::FakeToolInvoker;

/// A watch face project on disk with a cached validator jar.
pub struct ProjectFixture {
    pub dir: TempDir,
    pub layout: ProjectLayout,
}

impl ProjectFixture {
    pub fn new(release: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ConfigFileBuilder::new()
            .with_packaging_tasks()
            .with_release(release)
            .build();
        let layout = ProjectLayout::resolve(&cfg, dir.path(), None).unwrap();

        let fixture = Self { dir, layout };
        fixture.write(&fixture.layout.manifest, &manifest_xml(2));
        fixture.write(&fixture.layout.validator.jar_path, "validator jar v1");
        fixture
    }

    pub fn write(&self, path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// Write a file relative to the resource root.
    pub fn res(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.layout.res_dir.join(rel);
        self.write(&path, contents);
        path
    }

    pub fn remove_res(&self, rel: &str) {
        std::fs::remove_file(self.layout.res_dir.join(rel)).unwrap();
    }

    pub fn request(&self) -> ValidationRequest {
        ValidationRequest {
            root: self.layout.res_dir.clone(),
            manifest: self.layout.manifest.clone(),
            tool: self.layout.validator.jar_path.clone(),
            record: self.layout.validator.output_path.clone(),
        }
    }

    pub fn store(&self) -> FileFingerprintStore {
        FileFingerprintStore::new(Arc::new(RealFileSystem), self.layout.validation_state_path())
    }

    pub fn runner(&self, invoker: &FakeToolInvoker) -> ValidationRunner {
        ValidationRunner::new(
            Arc::new(RealFileSystem),
            Arc::new(invoker.clone()),
            WatchedFilePredicate::default(),
        )
    }

    pub fn record(&self) -> String {
        std::fs::read_to_string(&self.layout.validator.output_path).unwrap()
    }
}
