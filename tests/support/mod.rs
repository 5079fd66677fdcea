#![allow(dead_code)]
pub mod builders;

use statement_kit::config::ServerConfig;
use statement_kit::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use umya_spreadsheet::Spreadsheet;

/// A tempdir of workbook fixtures plus state constructors, shared by the
/// integration tests.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Build a workbook in memory and write it as `<name>` in the workspace.
    /// Calling it again with the same name overwrites the fixture, which the
    /// cache tests rely on.
    pub fn create_workbook(
        &self,
        name: &str,
        build: impl FnOnce(&mut Spreadsheet),
    ) -> PathBuf {
        let mut book = umya_spreadsheet::new_file();
        build(&mut book);
        let path = self.dir.path().join(name);
        umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write workbook");
        path
    }

    pub fn app_state(&self) -> Arc<AppState> {
        app_state_with_config(ServerConfig::default())
    }
}

pub fn app_state_with_config(config: ServerConfig) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(config)))
}
