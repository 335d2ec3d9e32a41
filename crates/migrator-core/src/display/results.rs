//! Display implementations for validation and execution outcomes.

use std::{fmt, time::Duration};

use crate::models::{IssueCode, MigrationResult, StepResult, ValidationIssue, ValidationResult};

/// Compact duration rendering: `850ms`, `2.41s`.
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < Duration::from_secs(1) {
            write!(f, "{}ms", self.0.as_millis())
        } else {
            write!(f, "{:.2}s", self.0.as_secs_f64())
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step_index {
            Some(index) => write!(f, "- `{}` (step {index}): {}", self.code, self.message),
            None => write!(f, "- `{}`: {}", self.code, self.message),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            writeln!(f, "Plan is valid.")?;
        } else {
            writeln!(f, "Plan is invalid.")?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "\n## Errors")?;
            writeln!(f)?;
            for issue in &self.errors {
                writeln!(f, "{issue}")?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "\n## Warnings")?;
            writeln!(f)?;
            for issue in &self.warnings {
                writeln!(f, "{issue}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {} **{}. {}** ({})",
            self.step.status.with_icon(),
            self.step.index,
            self.step.action,
            Elapsed(self.duration)
        )?;
        if let Some(message) = self.message.as_ref().or(self.error_message.as_ref()) {
            write!(f, ": {message}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for MigrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.success { "succeeded" } else { "failed" };
        writeln!(f, "# {} {outcome}", self.plan.name)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Steps run: {} of {}",
            self.step_results.len(),
            self.plan.steps.len()
        )?;
        writeln!(f, "- Duration: {}", Elapsed(self.duration))?;
        if let Some(error) = &self.error_message {
            writeln!(f, "- Error: {error}")?;
        }

        if !self.step_results.is_empty() {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for result in &self.step_results {
                write!(f, "{result}")?;
            }
        }

        let skipped: Vec<_> = self
            .plan
            .steps
            .iter()
            .skip(self.step_results.len())
            .collect();
        if !skipped.is_empty() {
            writeln!(f, "\n## Skipped")?;
            writeln!(f)?;
            for step in skipped {
                writeln!(
                    f,
                    "- {} **{}. {}**",
                    step.status.with_icon(),
                    step.index,
                    step.action
                )?;
            }
        }

        Ok(())
    }
}
