//! Plan execution, dry-run previews and rollback.
//!
//! The executor walks a plan's steps strictly in order, dispatching each one
//! to the handler for its [`Action`]. The first failing step stops the run;
//! every step after it is marked skipped.
//!
//! ```text
//! execute ──► for each step ──► cancelled? ──► progress ──► execute_step
//!                                                              │
//!                     ┌────────────────────────────────────────┘
//!                     ▼
//!              handlers (move / copy / rename / references / properties)
//!                     │
//!                     └─► references (fix-up after folder moves)
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Executor`] instances with configuration
//! - [`progress`]: Per-step progress notifications
//! - [`handlers`]: One handler per action
//! - [`references`]: Project and solution reference repair after folder moves
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use migrator_core::{
//!     executor::Progress,
//!     models::{Action, Plan, Step},
//!     ExecutorBuilder,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = ExecutorBuilder::new()
//!     .with_workspace_root(Some("/work/repo"))
//!     .dry_run(true)
//!     .build()
//!     .await?;
//!
//! let plan = Plan::new("Move tests")
//!     .with_steps(vec![Step::new(Action::MoveFile, "a.cs", "b.cs")]);
//! let report = |progress: &Progress| println!("{}", progress.message);
//! let result = executor
//!     .execute(&plan, Some(&report), &CancellationToken::new())
//!     .await?;
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use jiff::Timestamp;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{MigrationError, Result},
    fs::FileSystem,
    models::{Action, MigrationResult, Plan, PlanStatus, Step, StepResult},
    paths,
    rewrite::NamespaceRewriter,
};

pub mod builder;
pub mod handlers;
pub mod progress;
pub mod references;

#[cfg(test)]
mod tests;

pub use builder::ExecutorBuilder;
pub use progress::{Progress, ProgressSink};
pub use references::{ReferenceOutcome, ReferenceUpdate};

/// Default glob for project descriptor file names.
pub const DEFAULT_PROJECT_PATTERN: &str = "*.csproj";

/// Glob for solution file names.
pub const SOLUTION_PATTERN: &str = "*.sln";

/// Executor settings fixed at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Preview every step without mutating storage
    pub dry_run: bool,
    /// Directory relative step paths are resolved against
    pub workspace_root: Option<PathBuf>,
    /// Glob matching project descriptor file names
    pub project_pattern: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            workspace_root: None,
            project_pattern: DEFAULT_PROJECT_PATTERN.to_string(),
        }
    }
}

/// Runs plans against a file system.
pub struct Executor {
    pub(crate) file_system: Arc<dyn FileSystem>,
    pub(crate) rewriter: Arc<dyn NamespaceRewriter>,
    pub(crate) config: ExecutorConfig,
}

impl Executor {
    pub(crate) fn new(
        file_system: Arc<dyn FileSystem>,
        rewriter: Arc<dyn NamespaceRewriter>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            file_system,
            rewriter,
            config,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Resolves a step path against the workspace root.
    ///
    /// Absolute paths pass through unchanged; relative paths are joined onto
    /// the workspace root when one is configured.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        paths::resolve_path(self.config.workspace_root.as_deref(), path)
    }

    /// Runs every step of `plan` in order.
    ///
    /// Returns a [`MigrationResult`] whose plan snapshot carries each step's
    /// final status. After the first failing step the remaining steps are
    /// marked skipped and not attempted. The input plan is left untouched.
    ///
    /// # Errors
    ///
    /// Only `MigrationError::Cancelled`. Every other failure is reported
    /// through the returned result.
    pub async fn execute(
        &self,
        plan: &Plan,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<MigrationResult> {
        let started = Instant::now();
        let total = plan.steps.len();
        let mut steps = Vec::with_capacity(total);
        let mut step_results = Vec::new();
        let mut error_message = None;

        info!(
            "Executing plan '{}' with {total} steps{}",
            plan.name,
            if self.config.dry_run { " (dry run)" } else { "" }
        );

        for (position, step) in plan.steps.iter().enumerate() {
            if error_message.is_some() {
                steps.push(step.skipped());
                continue;
            }
            if cancel.is_cancelled() {
                warn!("Plan '{}' cancelled before step {}", plan.name, step.index);
                return Err(MigrationError::Cancelled);
            }
            if let Some(sink) = progress {
                sink.report(&Progress::before_step(position + 1, total, step));
            }

            let result = self.execute_step(step, cancel).await?;
            if !result.success {
                error_message = result.error_message.clone();
            }
            steps.push(result.step.clone());
            step_results.push(result);
        }

        let success = step_results.iter().all(|result| result.success);
        let status = if success {
            PlanStatus::Completed
        } else {
            PlanStatus::Failed
        };
        let executed = Plan {
            steps,
            status,
            ..plan.clone()
        };

        let duration = started.elapsed();
        if success {
            info!("Plan '{}' completed in {duration:?}", plan.name);
        } else {
            warn!(
                "Plan '{}' failed after {} of {total} steps",
                plan.name,
                step_results.len()
            );
        }

        Ok(MigrationResult {
            success,
            plan: executed,
            step_results,
            duration,
            error_message,
        })
    }

    /// Runs a single step and stamps its outcome.
    ///
    /// # Errors
    ///
    /// Only `MigrationError::Cancelled`; handler failures become a failed
    /// [`StepResult`].
    pub async fn execute_step(&self, step: &Step, cancel: &CancellationToken) -> Result<StepResult> {
        let started = Instant::now();
        info!(
            "Step {}: {} {} -> {}",
            step.index,
            step.action.as_str(),
            step.source,
            step.target
        );

        let outcome = match step.action {
            Action::MoveFile => self.move_file(step, cancel).await,
            Action::MoveFolder => self.move_folder(step, cancel).await,
            Action::CopyFile => self.copy_file(step, cancel).await,
            Action::CopyFolder => self.copy_folder(step, cancel).await,
            Action::RenameNamespace => self.rename_namespace(step, cancel).await,
            Action::AddProjectReference => self.add_project_reference(step, cancel).await,
            Action::RemoveProjectReference => self.remove_project_reference(step, cancel).await,
            Action::UpdateProjectProperty => self.update_project_property(step, cancel).await,
            Action::CreateProject => self.create_project(step, cancel).await,
            Action::DeleteProject => self.delete_project(step, cancel).await,
        };

        let duration = started.elapsed();
        match outcome {
            Ok(message) => {
                info!("Step {} succeeded: {message}", step.index);
                Ok(StepResult::succeeded(
                    step.completed(Timestamp::now()),
                    message,
                    duration,
                ))
            }
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                let message = e.to_string();
                warn!("Step {} failed: {message}", step.index);
                Ok(StepResult::failed(
                    step.failed(message.clone(), Timestamp::now()),
                    message,
                    duration,
                ))
            }
        }
    }

    /// Builds the plan that reverses the completed steps of `plan`.
    ///
    /// Completed steps are visited last to first. Moves swap source and
    /// target, reference additions and removals swap action, and a created
    /// project is deleted again. Every other action cannot be reversed and is
    /// dropped. The returned plan is `Ready`; `plan` itself is not changed.
    pub fn rollback_plan(&self, plan: &Plan) -> Plan {
        let steps = plan.completed_steps().rev().filter_map(reverse_step).collect();

        Plan::new(format!("Rollback: {}", plan.name))
            .with_description(format!("Reverses the completed steps of plan {}", plan.id))
            .with_steps(steps)
            .with_status(PlanStatus::Ready)
    }

    /// Synthesizes the rollback plan for `plan` and executes it.
    ///
    /// # Errors
    ///
    /// Only `MigrationError::Cancelled`.
    pub async fn rollback(
        &self,
        plan: &Plan,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<MigrationResult> {
        let rollback = self.rollback_plan(plan);
        info!(
            "Rolling back plan '{}' with {} steps",
            plan.name,
            rollback.steps.len()
        );
        self.execute(&rollback, progress, cancel).await
    }
}

/// Reverse of a completed step, if the action can be undone.
fn reverse_step(step: &Step) -> Option<Step> {
    let reversed = match step.action {
        Action::MoveFile | Action::MoveFolder => {
            Step::new(step.action, step.target.clone(), step.source.clone())
        }
        Action::AddProjectReference => Step::new(
            Action::RemoveProjectReference,
            step.source.clone(),
            step.target.clone(),
        ),
        Action::RemoveProjectReference => Step::new(
            Action::AddProjectReference,
            step.source.clone(),
            step.target.clone(),
        ),
        Action::CreateProject => Step::new(Action::DeleteProject, step.target.clone(), ""),
        Action::CopyFile
        | Action::CopyFolder
        | Action::RenameNamespace
        | Action::UpdateProjectProperty
        | Action::DeleteProject => return None,
    };
    Some(Step {
        metadata: step.metadata.clone(),
        ..reversed
    })
}
