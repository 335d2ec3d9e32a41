//! Path helpers shared by the planner and executor.

use std::path::{Component, Path, PathBuf};

/// Resolves a step's source or target against the workspace root.
///
/// Absolute paths pass through unchanged. Relative paths are joined onto
/// `workspace_root` when one is configured and returned as-is otherwise.
pub fn resolve_path(workspace_root: Option<&Path>, path: impl AsRef<Path>) -> PathBuf {
    let candidate = path.as_ref();
    match workspace_root {
        Some(root) if candidate.is_relative() => root.join(candidate),
        _ => candidate.to_path_buf(),
    }
}

/// Path of `target` relative to the directory `base`, using `..` segments.
///
/// Both paths are compared component by component without touching the file
/// system, so they should be spelled the same way (both absolute, or both
/// relative to the same root).
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let target: Vec<Component<'_>> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// `path` rendered with backslash separators and with forward slashes.
pub fn separator_spellings(path: &Path) -> [String; 2] {
    let text = path.to_string_lossy();
    [text.replace('/', "\\"), text.replace('\\', "/")]
}
