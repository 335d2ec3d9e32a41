//! Plan and step mutations for the Planner.

use log::debug;

use super::Planner;
use crate::{
    error::{MigrationError, Result},
    models::{Plan, PlanStatus, Step},
};

fn ensure_editable(plan: &Plan) -> Result<()> {
    if plan.status.is_terminal() {
        return Err(MigrationError::PlanLocked {
            status: plan.status,
        });
    }
    Ok(())
}

impl Planner {
    /// Creates an empty draft plan.
    pub fn create_plan(&self, name: &str) -> Plan {
        let plan = Plan::new(name);
        debug!("Created plan {} ({})", plan.name, plan.id);
        plan
    }

    /// Returns a copy of `plan` with `step` appended as the last step.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::PlanLocked` if the plan was already executed.
    pub fn add_step(&self, plan: &Plan, step: Step) -> Result<Plan> {
        ensure_editable(plan)?;
        let mut steps = plan.steps.clone();
        steps.push(step);
        Ok(plan.with_steps(steps))
    }

    /// Returns a copy of `plan` without the step at zero-based `position`,
    /// with the remaining steps re-indexed.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::StepOutOfRange` if `position` is not a valid
    /// position and `MigrationError::PlanLocked` if the plan was already
    /// executed.
    pub fn remove_step(&self, plan: &Plan, position: usize) -> Result<Plan> {
        if position >= plan.steps.len() {
            return Err(MigrationError::StepOutOfRange {
                position,
                len: plan.steps.len(),
            });
        }
        ensure_editable(plan)?;

        let steps = plan
            .steps
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, step)| step.clone())
            .collect();
        Ok(plan.with_steps(steps))
    }

    /// Returns a copy of a draft plan marked ready for execution.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::PlanLocked` if the plan was already executed.
    pub fn mark_ready(&self, plan: &Plan) -> Result<Plan> {
        ensure_editable(plan)?;
        Ok(plan.with_steps(plan.steps.clone()).with_status(PlanStatus::Ready))
    }
}
