//! The closed set of migration actions a step can perform.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operation performed by a single step.
///
/// The meaning of a step's `source` and `target` depends on the action:
///
/// | Action                   | source                  | target                    |
/// |--------------------------|-------------------------|---------------------------|
/// | `MoveFile`, `CopyFile`   | existing file           | destination file          |
/// | `MoveFolder`, `CopyFolder` | existing directory    | destination directory     |
/// | `RenameNamespace`        | source file to rewrite  | new namespace             |
/// | `AddProjectReference`    | project descriptor      | referenced project path   |
/// | `RemoveProjectReference` | project descriptor      | referenced project path   |
/// | `UpdateProjectProperty`  | project descriptor      | new property value        |
/// | `CreateProject`          | unused                  | descriptor to create      |
/// | `DeleteProject`          | descriptor or directory | unused                    |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveFile,
    MoveFolder,
    CopyFile,
    CopyFolder,
    RenameNamespace,
    AddProjectReference,
    RemoveProjectReference,
    UpdateProjectProperty,
    CreateProject,
    DeleteProject,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 10] = [
        Action::MoveFile,
        Action::MoveFolder,
        Action::CopyFile,
        Action::CopyFolder,
        Action::RenameNamespace,
        Action::AddProjectReference,
        Action::RemoveProjectReference,
        Action::UpdateProjectProperty,
        Action::CreateProject,
        Action::DeleteProject,
    ];

    /// Convert to the string used in exported plans.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveFile => "move_file",
            Action::MoveFolder => "move_folder",
            Action::CopyFile => "copy_file",
            Action::CopyFolder => "copy_folder",
            Action::RenameNamespace => "rename_namespace",
            Action::AddProjectReference => "add_project_reference",
            Action::RemoveProjectReference => "remove_project_reference",
            Action::UpdateProjectProperty => "update_project_property",
            Action::CreateProject => "create_project",
            Action::DeleteProject => "delete_project",
        }
    }

    pub fn requires_source(&self) -> bool {
        !matches!(self, Action::CreateProject)
    }

    pub fn requires_target(&self) -> bool {
        !matches!(self, Action::DeleteProject)
    }

    /// Move actions relocate their source.
    pub fn is_move(&self) -> bool {
        matches!(self, Action::MoveFile | Action::MoveFolder)
    }

    /// Move and copy actions, whose source and target are both paths.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Action::MoveFile | Action::MoveFolder | Action::CopyFile | Action::CopyFolder
        )
    }
}

impl FromStr for Action {
    type Err = String;

    /// Accepts `move_file`, `move-file` and `MoveFile` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Action::ALL
            .into_iter()
            .find(|action| action.as_str().replace('_', "") == normalized)
            .ok_or_else(|| format!("Invalid action: {s}"))
    }
}
