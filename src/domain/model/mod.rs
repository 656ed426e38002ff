// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::DomainError;

/// File name used for data discs that carry no volume label
pub const DATA_DISC_PLACEHOLDER: &str = "datadisc";

/// Physical disc classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscType {
    Data,
    Dvd,
    Bluray,
    Music,
    Unknown,
}

impl DiscType {
    /// Parse disc type from string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "data" => Ok(DiscType::Data),
            "dvd" => Ok(DiscType::Dvd),
            "bluray" | "bd" => Ok(DiscType::Bluray),
            "music" | "cd" => Ok(DiscType::Music),
            "unknown" => Ok(DiscType::Unknown),
            other => Err(DomainError::BadArgs(format!(
                "Invalid disc type: {}. Valid types: data, dvd, bluray, music, unknown",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscType::Data => "data",
            DiscType::Dvd => "dvd",
            DiscType::Bluray => "bluray",
            DiscType::Music => "music",
            DiscType::Unknown => "unknown",
        }
    }

    /// DVD and Blu-ray discs carry video titles
    pub fn is_video(&self) -> bool {
        matches!(self, DiscType::Dvd | DiscType::Bluray)
    }
}

impl fmt::Display for DiscType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category reported by the metadata service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    Movie,
    Series,
    #[default]
    Unknown,
}

impl VideoCategory {
    /// Map a metadata service type string onto a category
    pub fn from_service_type(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "movie" => VideoCategory::Movie,
            "series" | "episode" => VideoCategory::Series,
            _ => VideoCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Movie => "movie",
            VideoCategory::Series => "series",
            VideoCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optical drive state as reported by the drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DriveStatus {
    NoDisc,
    TrayOpen,
    NotReady,
    Ready,
}

impl DriveStatus {
    /// Map a `CDROM_DRIVE_STATUS` ioctl result (see linux/cdrom.h)
    pub fn from_ioctl(code: i32) -> Self {
        match code {
            1 => DriveStatus::NoDisc,
            2 => DriveStatus::TrayOpen,
            4 => DriveStatus::Ready,
            _ => DriveStatus::NotReady,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriveStatus::NoDisc => "no-disc",
            DriveStatus::TrayOpen => "tray-open",
            DriveStatus::NotReady => "not-ready",
            DriveStatus::Ready => "ready",
        }
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a disc inspection
#[derive(Debug, Clone, PartialEq)]
pub struct DiscIdentity {
    pub disc_type: DiscType,
    pub label: String,
}

/// A successful metadata match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleMatch {
    /// Canonical title, when the service returned one
    pub title: Option<String>,
    pub year: String,
    pub category: VideoCategory,
}

/// Outcome of progressive title resolution
#[derive(Debug, Clone, PartialEq)]
pub enum TitleResolution {
    Resolved {
        /// Query string that produced the match
        query: String,
        matched: TitleMatch,
        attempts: usize,
    },
    Unresolved {
        attempts: usize,
    },
}

impl TitleResolution {
    pub fn attempts(&self) -> usize {
        match self {
            TitleResolution::Resolved { attempts, .. } => *attempts,
            TitleResolution::Unresolved { attempts } => *attempts,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TitleResolution::Resolved { .. })
    }
}

/// Identity and classification of one inserted disc, owned by a single run
#[derive(Debug, Clone, Serialize)]
pub struct DiscDescriptor {
    device_path: String,
    disc_type: DiscType,
    label: String,
    video_title: String,
    video_year: String,
    video_category: VideoCategory,
    has_resolved_title: bool,
    errors: Vec<String>,
}

impl DiscDescriptor {
    /// Create a descriptor once the disc type is known; the type is fixed from here on
    pub fn classified(
        device_path: impl Into<String>,
        disc_type: DiscType,
        label: impl Into<String>,
    ) -> Self {
        let label = label.into().trim().to_string();
        Self {
            device_path: device_path.into(),
            disc_type,
            video_title: if disc_type.is_video() {
                label.clone()
            } else {
                String::new()
            },
            label,
            video_year: String::new(),
            video_category: VideoCategory::Unknown,
            has_resolved_title: false,
            errors: Vec::new(),
        }
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    pub fn disc_type(&self) -> DiscType {
        self.disc_type
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn video_title(&self) -> &str {
        &self.video_title
    }

    pub fn video_year(&self) -> &str {
        &self.video_year
    }

    pub fn video_category(&self) -> VideoCategory {
        self.video_category
    }

    pub fn has_resolved_title(&self) -> bool {
        self.has_resolved_title
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Apply a title resolution. Only video discs accept one.
    pub fn apply_resolution(&mut self, resolution: &TitleResolution) {
        if !self.disc_type.is_video() {
            return;
        }
        if let TitleResolution::Resolved { matched, .. } = resolution {
            if let Some(title) = matched.title.as_deref().filter(|t| !t.trim().is_empty()) {
                self.video_title = title.trim().to_string();
            }
            self.video_year = matched.year.clone();
            self.video_category = matched.category;
            self.has_resolved_title = true;
        }
    }

    /// Append a per-title failure
    pub fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Label, or the data placeholder when the disc has none
    pub fn label_or_placeholder(&self) -> &str {
        if self.label.is_empty() {
            DATA_DISC_PLACEHOLDER
        } else {
            &self.label
        }
    }

    /// Human readable name used in notifications
    pub fn display_name(&self) -> &str {
        if self.disc_type.is_video() && !self.video_title.is_empty() {
            &self.video_title
        } else {
            self.label_or_placeholder()
        }
    }

    /// Directory name under the media root: `<title> (<year>)` when resolved
    pub fn destination_name(&self) -> String {
        if self.disc_type.is_video() && self.has_resolved_title {
            crate::domain::rules::title_directory_name(&self.video_title, &self.video_year)
        } else {
            crate::domain::rules::sanitize_path_component(self.label_or_placeholder())
        }
    }

    /// Category that drives placement; unresolved titles are never movies
    pub fn placement_category(&self) -> VideoCategory {
        if self.has_resolved_title {
            self.video_category
        } else {
            VideoCategory::Unknown
        }
    }

    /// Log file name for external tool output
    pub fn log_file_name(&self) -> String {
        if !self.label.is_empty() {
            return format!(
                "{}.log",
                crate::domain::rules::sanitize_path_component(&self.label)
            );
        }
        match self.disc_type {
            DiscType::Music => "music_cd.log".to_string(),
            DiscType::Dvd => "dvd.log".to_string(),
            DiscType::Bluray => "bluray.log".to_string(),
            _ => "empty.log".to_string(),
        }
    }
}

/// One file produced by a rip or transcode pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub size: u64,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Files produced by one pass, rooted at a single working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFileSet {
    pub root: PathBuf,
    pub files: Vec<OutputFile>,
}

impl OutputFileSet {
    pub fn new(root: impl Into<PathBuf>, files: Vec<OutputFile>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn path_of(&self, file: &OutputFile) -> PathBuf {
        self.root.join(&file.name)
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Ripping strategy resolved once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RipStrategy {
    MainFeatureOnly,
    FullDiscMkv,
    FullDiscBackup,
    MusicExtract,
    DataCopy,
}

impl RipStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RipStrategy::MainFeatureOnly => "mainFeatureOnly",
            RipStrategy::FullDiscMkv => "fullDiscMKV",
            RipStrategy::FullDiscBackup => "fullDiscBackup",
            RipStrategy::MusicExtract => "musicExtract",
            RipStrategy::DataCopy => "dataCopy",
        }
    }
}

impl fmt::Display for RipStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline states, visited in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Classified,
    StrategySelected,
    Ripping,
    Placing,
    Finalized,
}

/// Why a file was left where it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// What Output Placement did with a file set
#[derive(Debug, Clone, Default)]
pub struct PlacementReport {
    pub main_feature: Option<PathBuf>,
    pub moved: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<DomainError>,
    pub staging_removed: bool,
}

impl PlacementReport {
    pub fn skip(&mut self, name: &str, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            name: name.to_string(),
            reason: reason.into(),
        });
    }

    /// Number of files the report accounts for
    pub fn accounted(&self) -> usize {
        self.moved.len() + self.skipped.len() + self.failed.len()
    }
}

/// Final result of one run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub device_path: String,
    pub disc_type: DiscType,
    pub strategy: Option<RipStrategy>,
    pub states: Vec<RunState>,
    pub errors: Vec<String>,
    pub fatal: Option<DomainError>,
    pub placement: Option<PlacementReport>,
    pub destination: Option<PathBuf>,
}

impl RunOutcome {
    pub fn final_state(&self) -> Option<RunState> {
        self.states.last().copied()
    }

    /// True only when nothing fatal happened and no title failed
    pub fn is_success(&self) -> bool {
        self.fatal.is_none() && self.errors.is_empty()
    }
}

/// Structured description of an external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// Append stdout and stderr to this file instead of capturing them
    pub log_file: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            log_file: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().to_string())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn log_to(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    /// Program plus arguments, for logging only
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Exit information of a finished external process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Convert a non-zero exit into a `ToolFailed` error
    pub fn into_result(self, tool: &str) -> Result<ToolOutput, DomainError> {
        if self.success() {
            return Ok(self);
        }
        let detail = self
            .stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("see tool log")
            .trim()
            .to_string();
        Err(DomainError::ToolFailed {
            tool: tool.to_string(),
            status: self.status,
            detail,
        })
    }
}

#[cfg(test)]
mod tests;
