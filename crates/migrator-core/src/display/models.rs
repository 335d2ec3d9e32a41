//! Display implementations for domain models.
//!
//! This module contains the Display trait implementations for plans, steps
//! and their enums, kept apart from the model definitions. Output is
//! markdown for rich terminal display.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Action, Plan, PlanStatus, Step, StepStatus};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Modified: {}", LocalDateTime(&self.modified_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.index,
            self.action,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if !self.source.is_empty() {
            writeln!(f, "- Source: `{}`", self.source)?;
        }
        if !self.target.is_empty() {
            writeln!(f, "- Target: `{}`", self.target)?;
        }
        for (key, value) in &self.metadata {
            writeln!(f, "- {key}: `{value}`")?;
        }
        if let Some(at) = &self.executed_at {
            writeln!(f, "- Executed: {}", LocalDateTime(at))?;
        }
        writeln!(f)?;

        if let Some(error) = &self.error_message {
            writeln!(f, "#### Error")?;
            writeln!(f)?;
            writeln!(f, "{error}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}
