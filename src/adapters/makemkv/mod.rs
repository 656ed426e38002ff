// MakeMKV adapter - Full-disc rips and backups through makemkvcon

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RipSettings;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Disc index MakeMKV scans when asked to list every drive
const SCAN_ALL_DISCS: &str = "disc:9999";

/// Ripper backed by `makemkvcon`
pub struct MakeMkvAdapter {
    program: String,
    settings: RipSettings,
    process: Arc<dyn ProcessPort>,
    fs: Arc<dyn FsPort>,
}

impl MakeMkvAdapter {
    pub fn new(
        program: impl Into<String>,
        settings: RipSettings,
        process: Arc<dyn ProcessPort>,
        fs: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            program: program.into(),
            settings,
            process,
            fs,
        }
    }

    /// Arguments for a title-by-title MKV rip
    pub fn mkv_command(&self, request: &RipRequest) -> CommandSpec {
        CommandSpec::new(&self.program)
            .arg("mkv")
            .args(self.settings.mkv_args.iter().cloned())
            .arg("-r")
            .arg(format!("dev:{}", request.device_path))
            .arg("all")
            .path_arg(&request.dest_dir)
            .arg(format!("--minlength={}", self.settings.min_length))
            .log_to(request.log_file.clone())
    }

    /// Arguments for a decrypted full-disc backup
    pub fn backup_command(&self, request: &RipRequest, disc_index: u32) -> CommandSpec {
        CommandSpec::new(&self.program)
            .arg("backup")
            .arg("--decrypt")
            .args(self.settings.mkv_args.iter().cloned())
            .arg("-r")
            .arg(format!("disc:{}", disc_index))
            .path_arg(&request.dest_dir)
            .log_to(request.log_file.clone())
    }

    /// Ask MakeMKV which of its disc indices maps to `device_path`
    async fn disc_index(&self, device_path: &str) -> Result<u32, DomainError> {
        let spec = CommandSpec::new(&self.program).args(["-r", "info", SCAN_ALL_DISCS]);
        let output = self.process.run(&spec).await?;
        // makemkvcon exits non-zero when disc:9999 does not exist; the drive list is still printed
        parse_disc_index(&output.stdout, device_path).ok_or_else(|| DomainError::ToolFailed {
            tool: self.program.clone(),
            status: output.status,
            detail: format!("no drive entry for {}", device_path),
        })
    }
}

/// Find the MakeMKV index of `device_path` in `makemkvcon -r info` output.
///
/// Drive lines look like `DRV:0,2,999,1,"BD-RE","LABEL","/dev/sr0"`.
pub fn parse_disc_index(info_output: &str, device_path: &str) -> Option<u32> {
    let quoted = format!("\"{}\"", device_path);
    info_output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("DRV:"))
        .find(|rest| rest.contains(&quoted))
        .and_then(|rest| rest.split(',').next())
        .and_then(|index| index.trim().parse().ok())
}

#[async_trait]
impl RipperPort for MakeMkvAdapter {
    async fn rip(&self, request: &RipRequest) -> Result<OutputFileSet, DomainError> {
        let spec = match request.strategy {
            RipStrategy::FullDiscBackup => {
                let index = self.disc_index(&request.device_path).await?;
                tracing::info!(disc_index = index, "MakeMKV disc number");
                tracing::info!(dest = %request.dest_dir.display(), "Backing up disc");
                self.backup_command(request, index)
            }
            RipStrategy::FullDiscMkv => {
                tracing::info!(dest = %request.dest_dir.display(), "Ripping disc");
                self.mkv_command(request)
            }
            other => {
                return Err(DomainError::BadArgs(format!(
                    "MakeMKV cannot perform strategy {}",
                    other
                )))
            }
        };
        tracing::debug!(command = %spec.display(), "MakeMKV command");

        let output = self.process.run(&spec).await?;
        tracing::debug!(status = ?output.status, "MakeMKV exited");
        output.into_result(&self.program)?;

        self.fs.list_files(&request.dest_dir).await
    }
}
