//! Plan validation outcome types.

use serde::{Deserialize, Serialize};

/// Machine-readable code attached to every validation issue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    EmptyPlan,
    MissingSource,
    MissingTarget,
    SourceNotFound,
    TargetExists,
    MissingOldNamespace,
    MissingPropertyName,
    CircularDependency,
    DuplicateTarget,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::EmptyPlan => "EMPTY_PLAN",
            IssueCode::MissingSource => "MISSING_SOURCE",
            IssueCode::MissingTarget => "MISSING_TARGET",
            IssueCode::SourceNotFound => "SOURCE_NOT_FOUND",
            IssueCode::TargetExists => "TARGET_EXISTS",
            IssueCode::MissingOldNamespace => "MISSING_OLD_NAMESPACE",
            IssueCode::MissingPropertyName => "MISSING_PROPERTY_NAME",
            IssueCode::CircularDependency => "CIRCULAR_DEPENDENCY",
            IssueCode::DuplicateTarget => "DUPLICATE_TARGET",
        }
    }
}

/// A single validation error or warning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// 1-based index of the offending step, `None` for plan-level issues
    pub step_index: Option<usize>,
    pub message: String,
    pub code: IssueCode,
}

impl ValidationIssue {
    pub fn plan(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            step_index: None,
            message: message.into(),
            code,
        }
    }

    pub fn step(index: usize, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            step_index: Some(index),
            message: message.into(),
            code,
        }
    }
}

/// Outcome of validating a plan.
///
/// Errors make the plan invalid; warnings are advisory and never affect
/// `is_valid`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Whether any error carries `code`.
    pub fn has_error(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|issue| issue.code == code)
    }

    /// Whether any warning carries `code`.
    pub fn has_warning(&self, code: IssueCode) -> bool {
        self.warnings.iter().any(|issue| issue.code == code)
    }
}
