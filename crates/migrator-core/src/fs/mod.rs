//! File system collaborator used by the planner and executor.
//!
//! The engine never touches storage directly. Every call goes through the
//! [`FileSystem`] trait and carries the caller's [`CancellationToken`], so a
//! long directory scan can stop as soon as the operator cancels.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

pub mod local;

pub use local::LocalFileSystem;

/// Asynchronous, cancellable file system operations.
///
/// Implementations return [`crate::MigrationError::Cancelled`] when the token
/// fires during a call; the executor lets that error propagate and converts
/// every other error into a failed step.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path, cancel: &CancellationToken) -> Result<bool>;

    async fn is_directory(&self, path: &Path, cancel: &CancellationToken) -> Result<bool>;

    async fn read_file(&self, path: &Path, cancel: &CancellationToken) -> Result<String>;

    /// Writes `contents`, creating missing parent directories.
    async fn write_file(
        &self,
        path: &Path,
        contents: &str,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Moves a file or directory, creating missing parent directories.
    async fn move_path(&self, source: &Path, target: &Path, cancel: &CancellationToken)
        -> Result<()>;

    /// Copies a file or, recursively, a directory.
    async fn copy(
        &self,
        source: &Path,
        target: &Path,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn delete(&self, path: &Path, recursive: bool, cancel: &CancellationToken)
        -> Result<()>;

    /// Files under `dir` whose file name matches the glob `pattern`, sorted.
    async fn get_files(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>>;

    /// Immediate subdirectories of `dir`, sorted.
    async fn get_directories(&self, dir: &Path, cancel: &CancellationToken)
        -> Result<Vec<PathBuf>>;
}
