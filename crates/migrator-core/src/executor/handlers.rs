//! Step handlers, one per [`Action`](crate::models::Action).
//!
//! Each handler resolves the step's paths, checks its preconditions with
//! read-only calls, and then either returns a `[DRY RUN]` preview or performs
//! the change. Handlers return the human-readable outcome message on success;
//! any error is turned into a failed step by [`Executor::execute_step`].

use std::path::{Path, PathBuf};

use log::debug;
use tokio_util::sync::CancellationToken;

use super::Executor;
use crate::{
    error::{MigrationError, Result},
    models::{metadata, Step},
    project_file,
};

/// Kind of entry a transfer handler works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    File,
    Folder,
}

impl Entry {
    fn noun(self) -> &'static str {
        match self {
            Entry::File => "file",
            Entry::Folder => "folder",
        }
    }
}

/// Resolved source and target of a transfer step.
struct Transfer {
    source: PathBuf,
    target: PathBuf,
}

impl Executor {
    /// Shared precondition checks for move and copy steps.
    async fn check_transfer(
        &self,
        step: &Step,
        entry: Entry,
        cancel: &CancellationToken,
    ) -> Result<Transfer> {
        let source = self.resolve_path(&step.source);
        let target = self.resolve_path(&step.target);
        let fs = &self.file_system;

        if !fs.exists(&source, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Source {} does not exist: {}",
                entry.noun(),
                source.display()
            )));
        }
        if entry == Entry::Folder && !fs.is_directory(&source, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Source is not a directory: {}",
                source.display()
            )));
        }
        if fs.exists(&target, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Target {} already exists: {}",
                entry.noun(),
                target.display()
            )));
        }

        Ok(Transfer { source, target })
    }

    /// "N files, M subdirectories" summary of a folder about to be moved or
    /// copied.
    async fn folder_contents(&self, dir: &Path, cancel: &CancellationToken) -> Result<String> {
        let files = self.file_system.get_files(dir, "*", true, cancel).await?;
        let directories = self.file_system.get_directories(dir, cancel).await?;
        Ok(format!(
            "{} files, {} subdirectories",
            files.len(),
            directories.len()
        ))
    }

    pub(crate) async fn move_file(&self, step: &Step, cancel: &CancellationToken) -> Result<String> {
        let Transfer { source, target } = self.check_transfer(step, Entry::File, cancel).await?;
        if self.config.dry_run {
            return Ok(format!(
                "[DRY RUN] Would move file: {} -> {}",
                source.display(),
                target.display()
            ));
        }

        self.file_system.move_path(&source, &target, cancel).await?;
        Ok(format!("Moved file: {} -> {}", source.display(), target.display()))
    }

    pub(crate) async fn copy_file(&self, step: &Step, cancel: &CancellationToken) -> Result<String> {
        let Transfer { source, target } = self.check_transfer(step, Entry::File, cancel).await?;
        if self.config.dry_run {
            return Ok(format!(
                "[DRY RUN] Would copy file: {} -> {}",
                source.display(),
                target.display()
            ));
        }

        self.file_system.copy(&source, &target, false, cancel).await?;
        Ok(format!("Copied file: {} -> {}", source.display(), target.display()))
    }

    pub(crate) async fn move_folder(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let Transfer { source, target } = self.check_transfer(step, Entry::Folder, cancel).await?;
        if self.config.dry_run {
            let contents = self.folder_contents(&source, cancel).await?;
            return Ok(format!(
                "[DRY RUN] Would move {} ({contents}): {} -> {}",
                Entry::Folder.noun(),
                source.display(),
                target.display()
            ));
        }

        let project = match &self.config.workspace_root {
            Some(_) => self.project_in(&source, cancel).await?,
            None => None,
        };

        self.file_system.move_path(&source, &target, cancel).await?;
        let mut message = format!(
            "Moved {}: {} -> {}",
            Entry::Folder.noun(),
            source.display(),
            target.display()
        );

        if let Some(old_project) = project {
            if let Some(file_name) = old_project.file_name() {
                let new_project = target.join(file_name);
                let summary = self
                    .repair_references(&old_project, &new_project, cancel)
                    .await?;
                message.push_str(&summary);
            }
        }

        Ok(message)
    }

    pub(crate) async fn copy_folder(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let Transfer { source, target } = self.check_transfer(step, Entry::Folder, cancel).await?;
        if self.config.dry_run {
            let contents = self.folder_contents(&source, cancel).await?;
            return Ok(format!(
                "[DRY RUN] Would copy {} ({contents}): {} -> {}",
                Entry::Folder.noun(),
                source.display(),
                target.display()
            ));
        }

        self.file_system.copy(&source, &target, false, cancel).await?;
        Ok(format!(
            "Copied {}: {} -> {}",
            Entry::Folder.noun(),
            source.display(),
            target.display()
        ))
    }

    /// First project descriptor directly inside `dir`.
    async fn project_in(&self, dir: &Path, cancel: &CancellationToken) -> Result<Option<PathBuf>> {
        let projects = self
            .file_system
            .get_files(dir, &self.config.project_pattern, false, cancel)
            .await?;
        Ok(projects.into_iter().next())
    }

    pub(crate) async fn rename_namespace(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let old_namespace = step.metadata_value(metadata::OLD_NAMESPACE).ok_or_else(|| {
            MigrationError::precondition(format!(
                "Missing '{}' metadata for namespace rename",
                metadata::OLD_NAMESPACE
            ))
        })?;
        let new_namespace = step.target.trim();
        let source = self.resolve_path(&step.source);

        if !self.file_system.exists(&source, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Source file does not exist: {}",
                source.display()
            )));
        }
        if self.config.dry_run {
            return Ok(format!(
                "[DRY RUN] Would rename namespace {old_namespace} -> {new_namespace} in {}",
                source.display()
            ));
        }

        let text = self.file_system.read_file(&source, cancel).await?;
        let rewrite = self.rewriter.rewrite(&text, old_namespace, new_namespace)?;
        if !rewrite.is_changed() {
            debug!("No occurrences of {old_namespace} in {}", source.display());
            return Ok(format!("No changes needed in {}", source.display()));
        }

        self.file_system
            .write_file(&source, &rewrite.text, cancel)
            .await?;
        Ok(format!(
            "Renamed namespace {old_namespace} -> {new_namespace} in {} ({} occurrences)",
            source.display(),
            rewrite.changes
        ))
    }

    pub(crate) async fn add_project_reference(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let include = step.target.trim();
        let preview = format!("add reference to {include}");
        self.edit_project(step, &preview, cancel, |content| {
            project_file::add_reference(content, include)
        })
        .await
    }

    pub(crate) async fn remove_project_reference(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let include = step.target.trim();
        let preview = format!("remove reference to {include}");
        self.edit_project(step, &preview, cancel, |content| {
            project_file::remove_reference(content, include)
        })
        .await
    }

    pub(crate) async fn update_project_property(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let name = step.metadata_value(metadata::PROPERTY_NAME).ok_or_else(|| {
            MigrationError::precondition(format!(
                "Missing '{}' metadata for property update",
                metadata::PROPERTY_NAME
            ))
        })?;
        let value = step.target.as_str();
        let preview = format!("set {name} = {value}");
        self.edit_project(step, &preview, cancel, |content| {
            project_file::set_property(content, name, value)
        })
        .await
    }

    /// Reads the descriptor named by the step's source, applies `edit`, and
    /// writes the result back when it changed anything.
    async fn edit_project<F>(
        &self,
        step: &Step,
        description: &str,
        cancel: &CancellationToken,
        edit: F,
    ) -> Result<String>
    where
        F: FnOnce(&str) -> Result<Option<String>>,
    {
        let project = self.resolve_path(&step.source);
        if !self.file_system.exists(&project, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Project file does not exist: {}",
                project.display()
            )));
        }

        let content = self.file_system.read_file(&project, cancel).await?;
        let edited = edit(&content)?;
        if self.config.dry_run {
            return Ok(format!(
                "[DRY RUN] Would {description} in {}",
                project.display()
            ));
        }

        match edited {
            Some(updated) => {
                self.file_system.write_file(&project, &updated, cancel).await?;
                Ok(format!("Project updated ({description}): {}", project.display()))
            }
            None => {
                debug!("{} already satisfies: {description}", project.display());
                Ok(format!("No changes needed in {}", project.display()))
            }
        }
    }

    pub(crate) async fn create_project(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let target = self.resolve_path(&step.target);
        if self.file_system.exists(&target, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Target file already exists: {}",
                target.display()
            )));
        }
        if self.config.dry_run {
            return Ok(format!("[DRY RUN] Would create project: {}", target.display()));
        }

        let sdk = step
            .metadata_value(metadata::SDK)
            .unwrap_or(project_file::DEFAULT_SDK);
        let content =
            project_file::new_project(sdk, step.metadata_value(metadata::TARGET_FRAMEWORK));
        self.file_system.write_file(&target, &content, cancel).await?;
        Ok(format!("Created project: {}", target.display()))
    }

    pub(crate) async fn delete_project(
        &self,
        step: &Step,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let source = self.resolve_path(&step.source);
        if !self.file_system.exists(&source, cancel).await? {
            return Err(MigrationError::precondition(format!(
                "Source does not exist: {}",
                source.display()
            )));
        }
        let recursive = self.file_system.is_directory(&source, cancel).await?;
        if self.config.dry_run {
            return Ok(format!("[DRY RUN] Would delete project: {}", source.display()));
        }

        self.file_system.delete(&source, recursive, cancel).await?;
        Ok(format!("Deleted project: {}", source.display()))
    }
}
