//! [`FileSystem`] backed by the local disk.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use globset::Glob;
use log::debug;
use tokio::{fs, task};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use super::FileSystem;
use crate::error::{FileSystemResultExt, MigrationError, Result};

/// Local disk implementation using `tokio::fs` for single-path operations and
/// `walkdir` on the blocking pool for directory traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(MigrationError::Cancelled)
    } else {
        Ok(())
    }
}

async fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await.fs_context(parent)
        }
        _ => Ok(()),
    }
}

fn walk_error(error: walkdir::Error, root: &Path) -> MigrationError {
    let path = error.path().unwrap_or(root).to_path_buf();
    MigrationError::FileSystem {
        path,
        source: io::Error::from(error),
    }
}

fn join_error(error: task::JoinError) -> MigrationError {
    MigrationError::configuration(format!("Task join error: {error}"))
}

fn collect_files(
    dir: &Path,
    pattern: &str,
    recursive: bool,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .map_err(|e| MigrationError::invalid_input("pattern").with_reason(e.to_string()))?
        .compile_matcher();
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        ensure_active(cancel)?;
        let entry = entry.map_err(|e| walk_error(e, dir))?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn copy_directory(source: &Path, target: &Path, cancel: &CancellationToken) -> Result<()> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        ensure_active(cancel)?;
        let entry = entry.map_err(|e| walk_error(e, source))?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination).fs_context(&destination)?;
        } else {
            std::fs::copy(entry.path(), &destination).fs_context(&destination)?;
        }
    }
    Ok(())
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path, cancel: &CancellationToken) -> Result<bool> {
        ensure_active(cancel)?;
        fs::try_exists(path).await.fs_context(path)
    }

    async fn is_directory(&self, path: &Path, cancel: &CancellationToken) -> Result<bool> {
        ensure_active(cancel)?;
        match fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).fs_context(path),
        }
    }

    async fn read_file(&self, path: &Path, cancel: &CancellationToken) -> Result<String> {
        ensure_active(cancel)?;
        fs::read_to_string(path).await.fs_context(path)
    }

    async fn write_file(
        &self,
        path: &Path,
        contents: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        ensure_active(cancel)?;
        create_parent(path).await?;
        fs::write(path, contents).await.fs_context(path)
    }

    async fn move_path(
        &self,
        source: &Path,
        target: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        ensure_active(cancel)?;
        create_parent(target).await?;
        debug!("rename {} -> {}", source.display(), target.display());
        fs::rename(source, target).await.fs_context(source)
    }

    async fn copy(
        &self,
        source: &Path,
        target: &Path,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<()> {
        ensure_active(cancel)?;
        if !overwrite && fs::try_exists(target).await.fs_context(target)? {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "copy target already exists",
            ))
            .fs_context(target);
        }
        create_parent(target).await?;

        if self.is_directory(source, cancel).await? {
            let (source, target, cancel) =
                (source.to_path_buf(), target.to_path_buf(), cancel.clone());
            task::spawn_blocking(move || copy_directory(&source, &target, &cancel))
                .await
                .map_err(join_error)?
        } else {
            fs::copy(source, target).await.fs_context(target).map(|_| ())
        }
    }

    async fn delete(&self, path: &Path, recursive: bool, cancel: &CancellationToken) -> Result<()> {
        ensure_active(cancel)?;
        if self.is_directory(path, cancel).await? {
            if recursive {
                fs::remove_dir_all(path).await.fs_context(path)
            } else {
                fs::remove_dir(path).await.fs_context(path)
            }
        } else {
            fs::remove_file(path).await.fs_context(path)
        }
    }

    async fn get_files(
        &self,
        dir: &Path,
        pattern: &str,
        recursive: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        ensure_active(cancel)?;
        let (dir, pattern, cancel) = (dir.to_path_buf(), pattern.to_string(), cancel.clone());
        task::spawn_blocking(move || collect_files(&dir, &pattern, recursive, &cancel))
            .await
            .map_err(join_error)?
    }

    async fn get_directories(
        &self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<Vec<PathBuf>> {
        ensure_active(cancel)?;
        let mut entries = fs::read_dir(dir).await.fs_context(dir)?;
        let mut directories = Vec::new();
        while let Some(entry) = entries.next_entry().await.fs_context(dir)? {
            ensure_active(cancel)?;
            if entry.file_type().await.fs_context(&entry.path())?.is_dir() {
                directories.push(entry.path());
            }
        }
        directories.sort();
        Ok(directories)
    }
}
