// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for launching external processes from structured descriptors
#[async_trait]
pub trait ProcessPort: Send + Sync {
    /// Run a command to completion.
    ///
    /// Returns `DomainError::ToolStart` when the process cannot be spawned;
    /// a non-zero exit is reported through `ToolOutput::status`.
    async fn run(&self, command: &CommandSpec) -> Result<ToolOutput, DomainError>;
}

/// Port for classifying an inserted disc
#[async_trait]
pub trait DiscInspectorPort: Send + Sync {
    async fn classify(&self, device_path: &str) -> Result<DiscIdentity, DomainError>;
}

/// Port for drive status and tray control
#[async_trait]
pub trait DrivePort: Send + Sync {
    async fn status(&self, device_path: &str) -> Result<DriveStatus, DomainError>;

    /// Eject the disc; a drive with an open tray is left alone
    async fn eject(&self, device_path: &str) -> Result<(), DomainError>;
}

/// Port for the title metadata service
#[async_trait]
pub trait MetadataLookupPort: Send + Sync {
    /// Single lookup attempt. `Ok(None)` means the service had no match.
    async fn query(&self, title: &str, year: Option<&str>)
        -> Result<Option<TitleMatch>, DomainError>;
}

/// Full-disc rip request
#[derive(Debug, Clone)]
pub struct RipRequest {
    pub device_path: String,
    pub disc_type: DiscType,
    pub strategy: RipStrategy,
    pub dest_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

/// Port for the disc ripper
#[async_trait]
pub trait RipperPort: Send + Sync {
    /// Rip the disc into `dest_dir` and report the files produced
    async fn rip(&self, request: &RipRequest) -> Result<OutputFileSet, DomainError>;
}

/// Single transcode request
#[derive(Debug, Clone)]
pub struct TranscodeRequest {
    /// Device path for main-feature transcodes, raw file otherwise
    pub input: String,
    pub output: PathBuf,
    pub disc_type: DiscType,
    pub main_feature: bool,
    pub log_file: Option<PathBuf>,
}

/// Port for the transcoder
#[async_trait]
pub trait TranscoderPort: Send + Sync {
    /// Transcode one input to `request.output` and return the written path
    async fn transcode(&self, request: &TranscodeRequest) -> Result<PathBuf, DomainError>;
}

/// Port for audio CD extraction
#[async_trait]
pub trait AudioExtractorPort: Send + Sync {
    async fn extract(
        &self,
        device_path: &str,
        dest_dir: &Path,
        log_file: Option<&Path>,
    ) -> Result<(), DomainError>;
}

/// Port for raw device copies
#[async_trait]
pub trait ByteCopyPort: Send + Sync {
    async fn copy(
        &self,
        device_path: &str,
        dest_file: &Path,
        log_file: Option<&Path>,
    ) -> Result<(), DomainError>;
}

/// Port for user notifications. Delivery is best effort and never fails.
#[async_trait]
pub trait NotifyPort: Send + Sync {
    async fn notify(&self, title: &str, body: &str);
}

/// Port for media library rescans. Best effort.
#[async_trait]
pub trait LibraryRescanPort: Send + Sync {
    async fn rescan(&self);
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// List regular files directly under `dir` with their sizes, sorted by name.
    /// A missing directory yields an empty set.
    async fn list_files(&self, dir: &Path) -> Result<OutputFileSet, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir: &Path) -> Result<(), DomainError>;

    /// Create `dir`, appending a timestamp suffix when it already exists
    async fn create_unique_directory(&self, dir: &Path) -> Result<PathBuf, DomainError>;

    /// Move a file, falling back to copy and delete across devices
    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Move a whole directory tree to `to`. An existing, non-empty `to` is
    /// never overwritten.
    async fn move_directory(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Remove an empty directory
    async fn remove_directory(&self, dir: &Path) -> Result<(), DomainError>;

    /// Delete a directory recursively
    async fn delete_directory(&self, dir: &Path) -> Result<(), DomainError>;

    /// Apply `mode` to `root` and everything beneath it
    async fn set_permissions_recursive(&self, root: &Path, mode: u32) -> Result<usize, DomainError>;
}
