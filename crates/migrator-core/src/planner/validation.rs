//! Plan validation rules.
//!
//! | Code                    | Kind    | Rule                                               |
//! |-------------------------|---------|----------------------------------------------------|
//! | `EMPTY_PLAN`            | error   | the plan has no steps                              |
//! | `MISSING_SOURCE`        | error   | blank source (all actions but `CreateProject`)     |
//! | `MISSING_TARGET`        | error   | blank target (all actions but `DeleteProject`)     |
//! | `MISSING_OLD_NAMESPACE` | error   | `RenameNamespace` without `OldNamespace`           |
//! | `MISSING_PROPERTY_NAME` | error   | `UpdateProjectProperty` without `PropertyName`     |
//! | `CIRCULAR_DEPENDENCY`   | error   | a move targets the source of an earlier move/rename |
//! | `DUPLICATE_TARGET`      | error   | two steps share a non-blank target                 |
//! | `SOURCE_NOT_FOUND`      | warning | move/copy source does not exist                    |
//! | `TARGET_EXISTS`         | warning | move/copy target already exists                    |

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use super::Planner;
use crate::{
    error::Result,
    models::{metadata, Action, IssueCode, Plan, Step, ValidationIssue, ValidationResult},
    paths::resolve_path,
};

fn check_fields(step: &Step, errors: &mut Vec<ValidationIssue>) {
    let action = step.action;
    if action.requires_source() && step.source.trim().is_empty() {
        errors.push(ValidationIssue::step(
            step.index,
            IssueCode::MissingSource,
            format!("Step {} ({}) requires a source", step.index, action.as_str()),
        ));
    }
    if action.requires_target() && step.target.trim().is_empty() {
        errors.push(ValidationIssue::step(
            step.index,
            IssueCode::MissingTarget,
            format!("Step {} ({}) requires a target", step.index, action.as_str()),
        ));
    }

    match action {
        Action::RenameNamespace if step.metadata_value(metadata::OLD_NAMESPACE).is_none() => {
            errors.push(ValidationIssue::step(
                step.index,
                IssueCode::MissingOldNamespace,
                format!(
                    "Step {} renames a namespace but has no '{}' metadata",
                    step.index,
                    metadata::OLD_NAMESPACE
                ),
            ));
        }
        Action::UpdateProjectProperty if step.metadata_value(metadata::PROPERTY_NAME).is_none() => {
            errors.push(ValidationIssue::step(
                step.index,
                IssueCode::MissingPropertyName,
                format!(
                    "Step {} updates a project property but has no '{}' metadata",
                    step.index,
                    metadata::PROPERTY_NAME
                ),
            ));
        }
        _ => {}
    }
}

impl Planner {
    /// Checks `plan` against the validation rules.
    ///
    /// Plan content problems are reported in the returned
    /// [`ValidationResult`]; the status of `plan` is not changed.
    ///
    /// # Errors
    ///
    /// Only `MigrationError::Cancelled`, when `cancel` fires during an
    /// existence check.
    pub async fn validate_plan(
        &self,
        plan: &Plan,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if plan.steps.is_empty() {
            errors.push(ValidationIssue::plan(
                IssueCode::EmptyPlan,
                "Plan has no steps",
            ));
        }

        let mut earlier_sources: HashSet<&str> = HashSet::new();
        let mut claimed_targets: HashMap<&str, usize> = HashMap::new();

        for step in &plan.steps {
            check_fields(step, &mut errors);

            if step.action.is_transfer() {
                self.check_existence(step, &mut warnings, cancel).await?;
            }

            let source = step.source.trim();
            let target = step.target.trim();

            if step.action.is_move() && !target.is_empty() && earlier_sources.contains(target) {
                errors.push(ValidationIssue::step(
                    step.index,
                    IssueCode::CircularDependency,
                    format!(
                        "Step {} moves to '{target}', which an earlier step uses as its source",
                        step.index
                    ),
                ));
            }

            if !target.is_empty() {
                match claimed_targets.get(target) {
                    Some(first) => errors.push(ValidationIssue::step(
                        step.index,
                        IssueCode::DuplicateTarget,
                        format!(
                            "Step {} targets '{target}', which step {first} already targets",
                            step.index
                        ),
                    )),
                    None => {
                        claimed_targets.insert(target, step.index);
                    }
                }
            }

            if (step.action.is_move() || step.action == Action::RenameNamespace)
                && !source.is_empty()
            {
                earlier_sources.insert(source);
            }
        }

        debug!(
            "Validated plan {}: {} errors, {} warnings",
            plan.name,
            errors.len(),
            warnings.len()
        );
        Ok(ValidationResult::new(errors, warnings))
    }

    async fn check_existence(
        &self,
        step: &Step,
        warnings: &mut Vec<ValidationIssue>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if !step.source.trim().is_empty() && !self.path_exists(&step.source, cancel).await? {
            warnings.push(ValidationIssue::step(
                step.index,
                IssueCode::SourceNotFound,
                format!("Source does not exist: {}", step.source),
            ));
        }
        if !step.target.trim().is_empty() && self.path_exists(&step.target, cancel).await? {
            warnings.push(ValidationIssue::step(
                step.index,
                IssueCode::TargetExists,
                format!("Target already exists: {}", step.target),
            ));
        }
        Ok(())
    }

    /// Existence check that treats unreadable paths as absent.
    async fn path_exists(&self, path: &str, cancel: &CancellationToken) -> Result<bool> {
        let resolved = resolve_path(self.workspace_root.as_deref(), path);
        match self.file_system.exists(&resolved, cancel).await {
            Ok(exists) => Ok(exists),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                warn!("Could not check {}: {e}", resolved.display());
                Ok(false)
            }
        }
    }
}
