//! One-line confirmation messages for CLI commands.

use std::fmt;

/// Confirmation printed after a command that edits or writes a plan file.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Success or failure depending on `success`.
    pub fn from_outcome(success: bool, message: impl Into<String>) -> Self {
        if success {
            Self::success(message)
        } else {
            Self::failure(message)
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}
