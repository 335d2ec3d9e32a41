//! Step model definition and related functionality.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Action, StepStatus};

/// Well-known metadata keys.
pub mod metadata {
    /// Namespace being replaced by a `RenameNamespace` step.
    pub const OLD_NAMESPACE: &str = "OldNamespace";
    /// Property element name edited by an `UpdateProjectProperty` step.
    pub const PROPERTY_NAME: &str = "PropertyName";
    /// SDK attribute written by a `CreateProject` step.
    pub const SDK: &str = "Sdk";
    /// Target framework written by a `CreateProject` step.
    pub const TARGET_FRAMEWORK: &str = "TargetFramework";
}

/// Represents one operation within a plan.
///
/// Steps are values: every state change produces a new `Step` through one of
/// the `with_*`/outcome methods instead of mutating a shared instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Position within the plan (1-based, contiguous)
    #[serde(default)]
    pub index: usize,

    /// Operation to perform
    pub action: Action,

    /// Path or identifier the action reads from
    #[serde(default)]
    pub source: String,

    /// Path, namespace or value the action produces
    #[serde(default)]
    pub target: String,

    /// Action-specific extra fields
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Current execution status
    #[serde(default)]
    pub status: StepStatus,

    /// Failure description (set only when status = Failed)
    #[serde(default)]
    pub error_message: Option<String>,

    /// When the step finished running (Completed or Failed)
    #[serde(default)]
    pub executed_at: Option<Timestamp>,
}

impl Step {
    /// Creates a pending, not yet indexed step.
    pub fn new(action: Action, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            index: 0,
            action,
            source: source.into(),
            target: target.into(),
            metadata: BTreeMap::new(),
            status: StepStatus::Pending,
            error_message: None,
            executed_at: None,
        }
    }

    /// Returns a copy with an additional metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns a copy placed at `index`.
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// Metadata value for `key`, ignoring blank entries.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Snapshot of this step after a successful run.
    pub fn completed(&self, at: Timestamp) -> Self {
        Self {
            status: StepStatus::Completed,
            error_message: None,
            executed_at: Some(at),
            ..self.clone()
        }
    }

    /// Snapshot of this step after a failed run.
    pub fn failed(&self, message: impl Into<String>, at: Timestamp) -> Self {
        Self {
            status: StepStatus::Failed,
            error_message: Some(message.into()),
            executed_at: Some(at),
            ..self.clone()
        }
    }

    /// Snapshot of this step when it was never attempted.
    pub fn skipped(&self) -> Self {
        Self {
            status: StepStatus::Skipped,
            error_message: None,
            executed_at: None,
            ..self.clone()
        }
    }
}
