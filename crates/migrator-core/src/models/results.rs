//! Execution result types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Plan, Step};

/// Outcome of running one step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// Step snapshot after execution
    pub step: Step,
    pub success: bool,
    /// Human-readable outcome ("Moved: a -> b", dry-run previews, ...)
    pub message: Option<String>,
    pub error_message: Option<String>,
    pub duration: Duration,
}

impl StepResult {
    pub fn succeeded(step: Step, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            step,
            success: true,
            message: Some(message.into()),
            error_message: None,
            duration,
        }
    }

    pub fn failed(step: Step, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            step,
            success: false,
            message: None,
            error_message: Some(error.into()),
            duration,
        }
    }
}

/// Outcome of running a whole plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub success: bool,
    /// Plan snapshot carrying every step's final status
    pub plan: Plan,
    /// One entry per attempted step; shorter than `plan.steps` after a failure
    pub step_results: Vec<StepResult>,
    pub duration: Duration,
    /// Message of the first failing step
    pub error_message: Option<String>,
}
