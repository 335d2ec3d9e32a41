//! Error types for the migration engine.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::PlanStatus;

/// Comprehensive error type for all migration operations.
///
/// Step handlers surface their failures through this type as well; the
/// executor converts every variant except [`MigrationError::Cancelled`] into a
/// failed step result.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Step position outside the plan's step list
    #[error("Step position {position} is out of range for a plan with {len} steps")]
    StepOutOfRange { position: usize, len: usize },
    /// Plan has already been executed and can no longer be edited
    #[error("Plan is {status} and can no longer be modified")]
    PlanLocked { status: PlanStatus },
    /// A step precondition did not hold (missing source, existing target, ...)
    #[error("{message}")]
    Precondition { message: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Regular expression construction errors
    #[error("Pattern error: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// The operation was cancelled by the caller
    #[error("Operation was cancelled")]
    Cancelled,
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> MigrationError {
        MigrationError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl MigrationError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a step precondition failure.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error represents caller-requested cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Extension trait attaching the offending path to I/O errors.
pub trait FileSystemResultExt<T> {
    /// Map an I/O error into [`MigrationError::FileSystem`] for `path`.
    fn fs_context(self, path: &Path) -> Result<T>;
}

impl<T> FileSystemResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &Path) -> Result<T> {
        self.map_err(|source| MigrationError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;
