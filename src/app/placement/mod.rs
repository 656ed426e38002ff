// Output placement - Moves a rip's files into the final media layout

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::MainFeatureSelector;
use crate::ports::*;

/// Where and how a file set is placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTarget {
    pub category: VideoCategory,
    /// Final title directory
    pub dest_dir: PathBuf,
    /// File name given to the main feature, e.g. `The Matrix (1999).mkv`
    pub main_file_name: String,
    /// Extras subdirectory; `None` leaves extras in the staging directory
    pub extras_dir: Option<String>,
}

/// Output placement strategy
pub struct OutputPlacement {
    fs: Arc<dyn FsPort>,
}

impl OutputPlacement {
    pub fn new(fs: Arc<dyn FsPort>) -> Self {
        Self { fs }
    }

    /// Place every file of `files`. Each file ends up moved, skipped with a
    /// reason, or recorded as failed; nothing aborts the remaining files.
    pub async fn place(&self, files: &OutputFileSet, target: &PlacementTarget) -> PlacementReport {
        let mut report = PlacementReport::default();

        let main = match target.category {
            VideoCategory::Movie => match MainFeatureSelector::select(&files.files) {
                Some(main) if main.size > 0 => Some(main),
                Some(main) => {
                    tracing::warn!(
                        file = %main.name,
                        "Largest file is empty; placing all files without a main feature"
                    );
                    None
                }
                None => None,
            },
            _ => None,
        };

        match main {
            Some(main) => {
                tracing::info!(
                    file = %main.name,
                    size = main.size,
                    "Moving raw files. Identified main feature may not be actual main feature"
                );
                for file in &files.files {
                    let destination = if file == main {
                        target.dest_dir.join(&target.main_file_name)
                    } else if let Some(extras) = &target.extras_dir {
                        target.dest_dir.join(extras).join(&file.name)
                    } else {
                        tracing::info!(file = %file.name, "Not moving extra");
                        report.skip(&file.name, "extras placement disabled");
                        continue;
                    };
                    if file == main {
                        report.main_feature = Some(destination.clone());
                    }
                    self.move_one(files, file, &destination, &mut report).await;
                }
            }
            None => {
                for file in &files.files {
                    let destination = target.dest_dir.join(&file.name);
                    self.move_one(files, file, &destination, &mut report).await;
                }
            }
        }

        report.staging_removed = self.remove_staging(&files.root).await;
        tracing::info!(
            moved = report.moved.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Placement finished"
        );
        report
    }

    /// Place a disc backup tree as one unit into `dest_dir`
    pub async fn place_tree(&self, tree: &Path, dest_dir: &Path) -> PlacementReport {
        let mut report = PlacementReport::default();
        tracing::info!(from = %tree.display(), to = %dest_dir.display(), "Moving disc backup");
        match self.fs.move_directory(tree, dest_dir).await {
            Ok(()) => {
                report.moved.push(dest_dir.to_path_buf());
                report.staging_removed = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "Unable to move disc backup");
                report.failed.push(placement_error(dest_dir, &e));
            }
        }
        report
    }

    async fn move_one(
        &self,
        files: &OutputFileSet,
        file: &OutputFile,
        destination: &Path,
        report: &mut PlacementReport,
    ) {
        match self.fs.exists(destination).await {
            Ok(true) => {
                tracing::info!(
                    file = %file.name,
                    destination = %destination.display(),
                    "File already exists. Not moving."
                );
                report.skip(&file.name, format!("{} already exists", destination.display()));
                return;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "Could not check destination");
                report.failed.push(placement_error(destination, &e));
                return;
            }
        }

        let source = files.path_of(file);
        tracing::debug!(from = %source.display(), to = %destination.display(), "Moving file");
        match self.fs.move_file(&source, destination).await {
            Ok(()) => report.moved.push(destination.to_path_buf()),
            Err(e) => {
                tracing::error!(file = %file.name, error = %e, "Unable to move file");
                report.failed.push(placement_error(destination, &e));
            }
        }
    }

    async fn remove_staging(&self, staging: &Path) -> bool {
        match self.fs.remove_directory(staging).await {
            Ok(()) => {
                tracing::debug!(path = %staging.display(), "Removed staging directory");
                true
            }
            Err(e) => {
                tracing::debug!(path = %staging.display(), error = %e, "Failed to remove staging directory");
                false
            }
        }
    }

    /// Recursive chmod of `dest`; failures are logged and never escalated
    pub async fn normalize_permissions(&self, dest: &Path, mode: u32) -> Option<usize> {
        match self.fs.set_permissions_recursive(dest, mode).await {
            Ok(count) => {
                tracing::info!(path = %dest.display(), mode = %format!("{:o}", mode), entries = count, "Permissions set successfully");
                Some(count)
            }
            Err(e) => {
                tracing::warn!(path = %dest.display(), error = %e, "Permission update failed");
                None
            }
        }
    }
}

fn placement_error(destination: &Path, cause: &DomainError) -> DomainError {
    DomainError::Placement {
        path: destination.display().to_string(),
        reason: cause.to_string(),
    }
}
