//! Builder for creating and configuring Executor instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use globset::Glob;
use tokio_util::sync::CancellationToken;

use super::{Executor, ExecutorConfig};
use crate::{
    error::{MigrationError, Result},
    fs::{FileSystem, LocalFileSystem},
    rewrite::{NamespaceRewriter, RegexNamespaceRewriter},
};

/// Builder for creating and configuring Executor instances.
#[derive(Clone, Default)]
pub struct ExecutorBuilder {
    config: ExecutorConfig,
    file_system: Option<Arc<dyn FileSystem>>,
    rewriter: Option<Arc<dyn NamespaceRewriter>>,
}

impl ExecutorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory relative step paths are resolved against.
    ///
    /// Reference fix-up after folder moves and
    /// [`Executor::find_affected_projects`] need a workspace root.
    pub fn with_workspace_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config.workspace_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Runs every step as a preview without touching storage.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Glob matching project descriptor file names (default `*.csproj`).
    pub fn with_project_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.project_pattern = pattern.into();
        self
    }

    /// Replaces the default [`LocalFileSystem`].
    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    /// Replaces the default [`RegexNamespaceRewriter`].
    pub fn with_rewriter(mut self, rewriter: Arc<dyn NamespaceRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Builds the configured executor instance.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidInput` if the project pattern is not a
    /// valid glob and `MigrationError::Configuration` if the workspace root
    /// is not an existing directory.
    pub async fn build(self) -> Result<Executor> {
        Glob::new(&self.config.project_pattern).map_err(|e| {
            MigrationError::invalid_input("project_pattern").with_reason(e.to_string())
        })?;

        let file_system = self
            .file_system
            .unwrap_or_else(|| Arc::new(LocalFileSystem::new()));
        let rewriter = self
            .rewriter
            .unwrap_or_else(|| Arc::new(RegexNamespaceRewriter));

        if let Some(root) = &self.config.workspace_root {
            if !file_system
                .is_directory(root, &CancellationToken::new())
                .await?
            {
                return Err(MigrationError::configuration(format!(
                    "Workspace root is not a directory: {}",
                    root.display()
                )));
            }
        }

        Ok(Executor::new(file_system, rewriter, self.config))
    }

    /// Configuration collected so far.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Workspace root collected so far.
    pub fn workspace_root(&self) -> Option<&PathBuf> {
        self.config.workspace_root.as_ref()
    }
}
