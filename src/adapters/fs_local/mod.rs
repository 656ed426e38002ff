// Local filesystem adapter - File system operations for the rip work and media trees

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Local filesystem adapter
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }

    fn fail(action: &str, path: &Path, err: impl std::fmt::Display) -> DomainError {
        DomainError::FsFail(format!("Failed to {} {}: {}", action, path.display(), err))
    }

    /// Timestamp suffix in centiseconds, as used for colliding directory names
    fn unique_suffix() -> String {
        (chrono::Utc::now().timestamp_millis() / 10).to_string()
    }
}

impl Default for LocalFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn exists(&self, path: &Path) -> Result<bool, DomainError> {
        path.try_exists()
            .map_err(|e| Self::fail("check", path, e))
    }

    async fn list_files(&self, dir: &Path) -> Result<OutputFileSet, DomainError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(OutputFileSet::empty(dir));
            }
            Err(e) => return Err(Self::fail("list", dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::fail("list", dir, e))?;
            let metadata = entry
                .metadata()
                .map_err(|e| Self::fail("stat", &entry.path(), e))?;
            if !metadata.is_file() {
                continue;
            }
            files.push(OutputFile::new(
                entry.file_name().to_string_lossy().to_string(),
                metadata.len(),
            ));
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(OutputFileSet::new(dir, files))
    }

    async fn create_directory(&self, dir: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir).map_err(|e| Self::fail("create directory", dir, e))
    }

    async fn create_unique_directory(&self, dir: &Path) -> Result<PathBuf, DomainError> {
        let target = if dir.exists() {
            let mut name = dir.as_os_str().to_os_string();
            name.push("_");
            name.push(Self::unique_suffix());
            PathBuf::from(name)
        } else {
            dir.to_path_buf()
        };

        tracing::debug!(path = %target.display(), "Creating directory");
        fs::create_dir_all(&target).map_err(|e| Self::fail("create directory", &target, e))?;
        Ok(target)
    }

    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        // Ensure destination directory exists
        if let Some(parent) = to.parent() {
            self.create_directory(parent).await?;
        }

        if fs::rename(from, to).is_ok() {
            return Ok(());
        }

        // Rename fails across devices; copy then delete
        fs::copy(from, to).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to move file from {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })?;
        fs::remove_file(from).map_err(|e| Self::fail("remove source file", from, e))?;
        Ok(())
    }

    async fn move_directory(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        match fs::read_dir(to) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    return Err(DomainError::Placement {
                        path: to.display().to_string(),
                        reason: "destination directory is not empty".to_string(),
                    });
                }
                fs::remove_dir(to).map_err(|e| Self::fail("replace directory", to, e))?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = to.parent() {
                    self.create_directory(parent).await?;
                }
            }
            Err(e) => return Err(Self::fail("read directory", to, e)),
        }

        if fs::rename(from, to).is_ok() {
            return Ok(());
        }

        // Rename fails across devices; copy the tree then delete it
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| Self::fail("walk", from, e))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| Self::fail("walk", entry.path(), e))?;
            let target = to.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| Self::fail("create directory", &target, e))?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| Self::fail("copy", entry.path(), e))?;
            }
        }
        fs::remove_dir_all(from).map_err(|e| Self::fail("remove source directory", from, e))
    }

    async fn remove_directory(&self, dir: &Path) -> Result<(), DomainError> {
        match fs::remove_dir(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::fail("remove directory", dir, e)),
        }
    }

    async fn delete_directory(&self, dir: &Path) -> Result<(), DomainError> {
        match fs::remove_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::fail("delete directory", dir, e)),
        }
    }

    #[cfg(unix)]
    async fn set_permissions_recursive(&self, root: &Path, mode: u32) -> Result<usize, DomainError> {
        use std::os::unix::fs::PermissionsExt;

        let mut updated = 0;
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| DomainError::Permissions(e.to_string()))?;
            let path = entry.path();
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
                DomainError::Permissions(format!("{}: {}", path.display(), e))
            })?;
            tracing::trace!(path = %path.display(), mode = %format!("{:o}", mode), "Set permissions");
            updated += 1;
        }
        Ok(updated)
    }

    #[cfg(not(unix))]
    async fn set_permissions_recursive(&self, root: &Path, mode: u32) -> Result<usize, DomainError> {
        Err(DomainError::Permissions(format!(
            "Setting mode {:o} on {} is only supported on unix",
            mode,
            root.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_files_sorted_with_sizes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.mkv"), vec![0u8; 20]).unwrap();
        fs::write(temp.path().join("a.mkv"), vec![0u8; 10]).unwrap();
        fs::create_dir(temp.path().join("subdir")).unwrap();

        let set = LocalFsAdapter::new().list_files(temp.path()).await.unwrap();
        assert_eq!(
            set.files,
            vec![OutputFile::new("a.mkv", 10), OutputFile::new("b.mkv", 20)]
        );
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let set = LocalFsAdapter::new()
            .list_files(&temp.path().join("gone"))
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_unique_directory_appends_suffix() {
        let temp = TempDir::new().unwrap();
        let fs_port = LocalFsAdapter::new();
        let wanted = temp.path().join("The Matrix (1999)");

        let first = fs_port.create_unique_directory(&wanted).await.unwrap();
        assert_eq!(first, wanted);

        let second = fs_port.create_unique_directory(&wanted).await.unwrap();
        assert_ne!(second, wanted);
        assert!(second
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("The Matrix (1999)_"));
        assert!(second.is_dir());
    }

    #[tokio::test]
    async fn test_move_file_creates_parent() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("title.mkv");
        fs::write(&source, b"data").unwrap();
        let target = temp.path().join("media").join("extras").join("title.mkv");

        LocalFsAdapter::new().move_file(&source, &target).await.unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read(&target).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_move_directory_moves_whole_tree() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("raw").join("Shrek (2001)");
        fs::create_dir_all(source.join("BDMV").join("STREAM")).unwrap();
        fs::write(source.join("BDMV").join("STREAM").join("00000.m2ts"), b"video").unwrap();
        let target = temp.path().join("media").join("Shrek (2001)");
        fs::create_dir_all(&target).unwrap();

        LocalFsAdapter::new().move_directory(&source, &target).await.unwrap();
        assert!(!source.exists());
        assert_eq!(
            fs::read(target.join("BDMV").join("STREAM").join("00000.m2ts")).unwrap(),
            b"video"
        );
    }

    #[tokio::test]
    async fn test_move_directory_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("raw");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("new.m2ts"), b"new").unwrap();
        let target = temp.path().join("media");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("old.mkv"), b"old").unwrap();

        let err = LocalFsAdapter::new()
            .move_directory(&source, &target)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Placement { .. }));
        assert!(source.join("new.m2ts").is_file());
        assert_eq!(fs::read(target.join("old.mkv")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_remove_directory_is_harmless_when_missing() {
        let temp = TempDir::new().unwrap();
        let fs_port = LocalFsAdapter::new();
        let dir = temp.path().join("staging");
        fs::create_dir(&dir).unwrap();
        fs_port.remove_directory(&dir).await.unwrap();
        fs_port.remove_directory(&dir).await.unwrap();
        assert!(!dir.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_set_permissions_recursive() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("movie");
        fs::create_dir_all(dir.join("extras")).unwrap();
        fs::write(dir.join("movie.mkv"), b"x").unwrap();
        fs::write(dir.join("extras").join("t01.mkv"), b"y").unwrap();

        let count = LocalFsAdapter::new()
            .set_permissions_recursive(&dir, 0o750)
            .await
            .unwrap();
        assert_eq!(count, 4);
        let mode = fs::metadata(dir.join("extras").join("t01.mkv"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
