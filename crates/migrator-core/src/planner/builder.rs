//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio_util::sync::CancellationToken;

use super::Planner;
use crate::{
    error::{MigrationError, Result},
    fs::{FileSystem, LocalFileSystem},
};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    workspace_root: Option<PathBuf>,
    file_system: Option<Arc<dyn FileSystem>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory relative step paths are resolved against.
    ///
    /// Without a workspace root, relative sources and targets are checked as
    /// given (relative to the process working directory).
    pub fn with_workspace_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.workspace_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the default [`LocalFileSystem`].
    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Configuration` if the workspace root is not an
    /// existing directory.
    pub async fn build(self) -> Result<Planner> {
        let file_system = self
            .file_system
            .unwrap_or_else(|| Arc::new(LocalFileSystem::new()));

        if let Some(root) = &self.workspace_root {
            let is_dir = file_system
                .is_directory(root, &CancellationToken::new())
                .await?;
            if !is_dir {
                return Err(MigrationError::configuration(format!(
                    "Workspace root is not a directory: {}",
                    root.display()
                )));
            }
        }

        Ok(Planner::new(file_system, self.workspace_root))
    }
}
