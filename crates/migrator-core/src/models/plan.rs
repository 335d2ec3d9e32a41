//! Plan model definition and related functionality.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PlanStatus, Step, StepStatus};

/// Represents a complete migration plan with metadata and ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Opaque unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Human-readable plan name
    pub name: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last planner mutation (UTC)
    pub modified_at: Timestamp,

    /// Lifecycle status
    #[serde(default)]
    pub status: PlanStatus,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Plan {
    /// Creates an empty draft plan.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            created_at: now,
            modified_at: now,
            status: PlanStatus::Draft,
            steps: Vec::new(),
        }
    }

    /// Returns a copy with the given description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns a copy holding `steps`, re-indexed `1..=N`, with a newer
    /// modification time.
    pub fn with_steps(&self, steps: Vec<Step>) -> Self {
        Self {
            steps: reindex(steps),
            modified_at: next_timestamp(self.modified_at),
            ..self.clone()
        }
    }

    /// Returns a copy in the given status.
    pub fn with_status(&self, status: PlanStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Steps that finished successfully, in execution order.
    pub fn completed_steps(&self) -> impl DoubleEndedIterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
    }

    /// Number of steps in the given status.
    pub fn count_steps(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|step| step.status == status).count()
    }
}

/// Assigns contiguous 1-based indexes in list order.
fn reindex(steps: Vec<Step>) -> Vec<Step> {
    steps
        .into_iter()
        .enumerate()
        .map(|(position, step)| Step {
            index: position + 1,
            ..step
        })
        .collect()
}

/// Current time, or one nanosecond past `previous` when the clock has not
/// moved on since.
pub(crate) fn next_timestamp(previous: Timestamp) -> Timestamp {
    let now = Timestamp::now();
    if now > previous {
        now
    } else {
        previous
            .checked_add(SignedDuration::from_nanos(1))
            .unwrap_or(now)
    }
}
