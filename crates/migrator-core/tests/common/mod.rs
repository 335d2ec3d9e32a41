use std::{fs, path::Path};

use migrator_core::{Executor, ExecutorBuilder, Planner, PlannerBuilder};
use tempfile::TempDir;

/// Helper function to create a workspace with a planner and a live executor
pub async fn create_test_workspace() -> (TempDir, Planner, Executor) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = PlannerBuilder::new()
        .with_workspace_root(Some(temp_dir.path()))
        .build()
        .await
        .expect("Failed to create planner");
    let executor = create_executor(temp_dir.path(), false).await;
    (temp_dir, planner, executor)
}

/// Helper function to create an executor rooted at `root`
pub async fn create_executor(root: &Path, dry_run: bool) -> Executor {
    ExecutorBuilder::new()
        .with_workspace_root(Some(root))
        .dry_run(dry_run)
        .build()
        .await
        .expect("Failed to create executor")
}

/// Writes `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, contents).expect("Failed to write file");
}

pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read file")
}
