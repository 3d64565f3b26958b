//! File system utilities for bundling.
//!
//! Idempotent directory management and permission helpers.

use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Makes a file read-only for owner, group and others.
pub async fn set_readonly(path: &Path) -> Result<()> {
    #[cfg(unix)]
    let permissions = {
        use std::os::unix::fs::PermissionsExt;
        std::fs::Permissions::from_mode(0o444)
    };

    #[cfg(not(unix))]
    let permissions = {
        let mut permissions = fs::metadata(path)
            .await
            .fs_context("reading metadata of", path)?
            .permissions();
        permissions.set_readonly(true);
        permissions
    };

    fs::set_permissions(path, permissions)
        .await
        .fs_context("setting permissions on", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn erase_removes_stale_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        std::fs::create_dir_all(dir.join("dist")).unwrap();
        std::fs::write(dir.join("dist/stale.tar.gz"), b"old").unwrap();

        create_dir_all(&dir, true).await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn removal_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        remove_dir_all(&tmp.path().join("missing")).await.unwrap();
        remove_file(&tmp.path().join("missing.txt")).await.unwrap();
    }

    #[tokio::test]
    async fn readonly_file_reports_readonly() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("details.json");
        std::fs::write(&file, b"{}").unwrap();

        set_readonly(&file).await.unwrap();

        assert!(std::fs::metadata(&file).unwrap().permissions().readonly());
    }
}
