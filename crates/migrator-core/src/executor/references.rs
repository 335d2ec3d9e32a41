//! Project and solution reference repair after a project folder moves.
//!
//! Repair is a text heuristic: every project descriptor and solution file
//! under the workspace that mentions the moved project's base name is scanned
//! for the relative path from its own directory to the old location, and that
//! path is replaced by the relative path to the new location. Backslash
//! spelling is tried first, then forward slashes.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::{Executor, SOLUTION_PATTERN};
use crate::{
    error::{MigrationError, Result},
    paths::{relative_path, separator_spellings},
};

/// What happened to one affected descriptor or solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceOutcome {
    /// The file was rewritten
    Updated,
    /// The file mentions the project but not by the old relative path
    Unchanged,
    /// Reading or writing the file failed
    Failed(String),
}

/// Reference repair result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceUpdate {
    pub file: PathBuf,
    pub outcome: ReferenceOutcome,
}

impl ReferenceUpdate {
    pub fn is_updated(&self) -> bool {
        self.outcome == ReferenceOutcome::Updated
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ReferenceOutcome::Failed(_))
    }
}

impl Executor {
    fn require_workspace_root(&self) -> Result<&Path> {
        self.config.workspace_root.as_deref().ok_or_else(|| {
            MigrationError::configuration("A workspace root is required to scan for projects")
        })
    }

    /// Every project descriptor under the workspace whose text contains the
    /// base name of `project_path`.
    ///
    /// Descriptors that cannot be read are skipped.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Configuration` without a workspace root, and
    /// propagates failures of the workspace scan itself.
    pub async fn find_affected_projects(
        &self,
        project_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        self.files_mentioning(&self.config.project_pattern, project_path, cancel)
            .await
    }

    /// Every solution file under the workspace whose text contains the base
    /// name of `project_path`.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::find_affected_projects`].
    pub async fn find_affected_solutions(
        &self,
        project_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        self.files_mentioning(SOLUTION_PATTERN, project_path, cancel)
            .await
    }

    async fn files_mentioning(
        &self,
        pattern: &str,
        project_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        let root = self.require_workspace_root()?;
        let Some(name) = project_path.file_stem().map(|s| s.to_string_lossy()) else {
            return Ok(Vec::new());
        };

        let candidates = self
            .file_system
            .get_files(root, pattern, true, cancel)
            .await?;

        let mut affected = Vec::new();
        for candidate in candidates {
            match self.file_system.read_file(&candidate, cancel).await {
                Ok(text) if text.contains(&*name) => affected.push(candidate),
                Ok(_) => {}
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => debug!("Skipping unreadable file {}: {e}", candidate.display()),
            }
        }
        Ok(affected)
    }

    /// Rewrites references to `old_path` as references to `new_path` in every
    /// affected project descriptor.
    ///
    /// Does nothing under dry run. A failure on one descriptor is recorded in
    /// its [`ReferenceUpdate`] and does not stop the others.
    ///
    /// # Errors
    ///
    /// Same as [`Executor::find_affected_projects`].
    pub async fn update_references_after_move(
        &self,
        old_path: &Path,
        new_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceUpdate>> {
        if self.config.dry_run {
            return Ok(Vec::new());
        }

        let affected = self.find_affected_projects(old_path, cancel).await?;
        let updates = self.rewrite_all(affected, old_path, new_path, cancel).await?;
        info!(
            "Updated references to {} in {} of {} projects",
            old_path.display(),
            updates.iter().filter(|u| u.is_updated()).count(),
            updates.len()
        );
        Ok(updates)
    }

    /// Rewrites the moved project's path in every affected solution file.
    ///
    /// Same dry-run and per-file failure behavior as
    /// [`Executor::update_references_after_move`].
    ///
    /// # Errors
    ///
    /// Same as [`Executor::find_affected_projects`].
    pub async fn update_solutions_after_move(
        &self,
        old_path: &Path,
        new_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceUpdate>> {
        if self.config.dry_run {
            return Ok(Vec::new());
        }

        let affected = self.find_affected_solutions(old_path, cancel).await?;
        let updates = self.rewrite_all(affected, old_path, new_path, cancel).await?;
        info!(
            "Updated {} in {} of {} solutions",
            old_path.display(),
            updates.iter().filter(|u| u.is_updated()).count(),
            updates.len()
        );
        Ok(updates)
    }

    /// Project and solution repair after a folder move, as a suffix for the
    /// step message. Scan failures other than cancellation are only logged.
    pub(crate) async fn repair_references(
        &self,
        old_path: &Path,
        new_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let projects = self
            .update_references_after_move(old_path, new_path, cancel)
            .await;
        let mut summary = summarize("project references", old_path, projects)?;
        let solutions = self
            .update_solutions_after_move(old_path, new_path, cancel)
            .await;
        summary.push_str(&summarize("solutions", old_path, solutions)?);
        Ok(summary)
    }

    async fn rewrite_all(
        &self,
        files: Vec<PathBuf>,
        old_path: &Path,
        new_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<ReferenceUpdate>> {
        let mut updates = Vec::with_capacity(files.len());
        for file in files {
            let outcome = match self.rewrite_reference(&file, old_path, new_path, cancel).await {
                Ok(true) => ReferenceOutcome::Updated,
                Ok(false) => ReferenceOutcome::Unchanged,
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!("Failed to update references in {}: {e}", file.display());
                    ReferenceOutcome::Failed(e.to_string())
                }
            };
            updates.push(ReferenceUpdate { file, outcome });
        }
        Ok(updates)
    }

    /// Returns whether `file` was rewritten.
    async fn rewrite_reference(
        &self,
        file: &Path,
        old_path: &Path,
        new_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let base = file.parent().unwrap_or_else(|| Path::new(""));
        let old_spellings = separator_spellings(&relative_path(base, old_path));
        let new_spellings = separator_spellings(&relative_path(base, new_path));

        let content = self.file_system.read_file(file, cancel).await?;
        let updated = old_spellings
            .iter()
            .zip(new_spellings.iter())
            .map(|(old, new)| content.replace(old.as_str(), new))
            .find(|candidate| *candidate != content);

        match updated {
            Some(updated) => {
                self.file_system.write_file(file, &updated, cancel).await?;
                debug!("Rewrote reference in {}", file.display());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn summarize(
    label: &str,
    old_path: &Path,
    outcome: Result<Vec<ReferenceUpdate>>,
) -> Result<String> {
    match outcome {
        Ok(updates) => {
            let updated = updates.iter().filter(|u| u.is_updated()).count();
            let failed = updates.iter().filter(|u| u.is_failed()).count();
            if updated > 0 || failed > 0 {
                Ok(format!(" ({updated} {label} updated, {failed} failed)"))
            } else {
                Ok(String::new())
            }
        }
        Err(e) if e.is_cancelled() => Err(e),
        Err(e) => {
            warn!("Could not update {label} for {}: {e}", old_path.display());
            Ok(String::new())
        }
    }
}
