//! Typed configuration for a rip run
//!
//! A single [`RipConfig`] value is built at startup (defaults, then file,
//! then environment, then CLI) and handed to the container. Nothing reads
//! configuration after that point.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::StrategyOptions;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RipConfig {
    pub paths: PathsConfig,
    pub rip: RipSettings,
    pub transcode: TranscodeSettings,
    pub permissions: PermissionSettings,
    pub metadata: MetadataSettings,
    pub notify: NotifySettings,
    pub library: LibrarySettings,
    pub tools: ToolPaths,
    pub logging: LoggingSettings,
}

/// Working and destination roots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Working directory root for raw rips
    pub raw_path: PathBuf,
    /// Final media library root for video
    pub media_dir: PathBuf,
    /// Output root for audio CDs
    pub music_dir: PathBuf,
    /// Output root for data disc images
    pub data_dir: PathBuf,
    /// Directory for external tool logs
    pub log_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("/mnt/media/arm/raw"),
            media_dir: PathBuf::from("/mnt/media/arm/media"),
            music_dir: PathBuf::from("/mnt/media/arm/music"),
            data_dir: PathBuf::from("/mnt/media/arm/data"),
            log_path: PathBuf::from("/var/log/autorip"),
        }
    }
}

/// How a full-disc rip is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RipMethod {
    #[default]
    Mkv,
    Backup,
}

impl RipMethod {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "mkv" => Ok(RipMethod::Mkv),
            "backup" => Ok(RipMethod::Backup),
            other => Err(DomainError::Config(format!(
                "Invalid rip method: {}. Valid methods: mkv, backup",
                other
            ))),
        }
    }
}

/// Ripping behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RipSettings {
    /// Transcode only the main feature of DVDs
    pub main_feature: bool,
    pub rip_method: RipMethod,
    /// Place raw rips instead of transcoding them
    pub skip_transcode: bool,
    /// Delete the raw working directory after placement
    pub delete_raw_files: bool,
    /// Minimum title length in seconds passed to MakeMKV
    pub min_length: u32,
    /// Extra MakeMKV arguments
    pub mkv_args: Vec<String>,
    /// Extras subdirectory; the literal `none` disables extras placement
    pub extras_sub: String,
    /// Extension of final video files
    pub dest_ext: String,
}

impl Default for RipSettings {
    fn default() -> Self {
        Self {
            main_feature: false,
            rip_method: RipMethod::Mkv,
            skip_transcode: false,
            delete_raw_files: true,
            min_length: 600,
            mkv_args: Vec::new(),
            extras_sub: "extras".to_string(),
            dest_ext: "mkv".to_string(),
        }
    }
}

impl RipSettings {
    pub fn strategy_options(&self) -> StrategyOptions {
        StrategyOptions {
            main_feature_only: self.main_feature,
            backup_mode: self.rip_method == RipMethod::Backup,
        }
    }

    /// Extras subdirectory, or `None` when extras are disabled
    pub fn extras_dir(&self) -> Option<&str> {
        let sub = self.extras_sub.trim();
        if sub.is_empty() || sub.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(sub)
        }
    }
}

/// HandBrake presets and arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeSettings {
    pub preset_dvd: String,
    pub preset_bd: String,
    pub args_dvd: Vec<String>,
    pub args_bd: Vec<String>,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            preset_dvd: "HQ 720p30 Surround".to_string(),
            preset_bd: "HQ 1080p30 Surround".to_string(),
            args_dvd: Vec::new(),
            args_bd: Vec::new(),
        }
    }
}

/// Permission normalisation of placed files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub enabled: bool,
    /// Octal mode, e.g. "777"
    pub chmod_value: String,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            chmod_value: "777".to_string(),
        }
    }
}

impl PermissionSettings {
    /// Parse the configured octal mode
    pub fn mode(&self) -> Result<u32, DomainError> {
        parse_octal_mode(&self.chmod_value)
    }
}

/// Parse an octal permission string such as `775` or `0o755`
pub fn parse_octal_mode(value: &str) -> Result<u32, DomainError> {
    let trimmed = value.trim().trim_start_matches("0o");
    let mode = u32::from_str_radix(trimmed, 8)
        .map_err(|_| DomainError::Config(format!("Invalid octal mode: {}", value)))?;
    if mode > 0o7777 {
        return Err(DomainError::Config(format!("Octal mode out of range: {}", value)));
    }
    Ok(mode)
}

/// Metadata lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub omdb_api_key: String,
    pub omdb_url: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            omdb_api_key: String::new(),
            omdb_url: "http://www.omdbapi.com/".to_string(),
        }
    }
}

/// Notification channels; an empty key disables a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Notify when the raw rip finishes
    pub notify_rip: bool,
    /// Notify when the transcode pass finishes
    pub notify_transcode: bool,
    pub pushbullet_key: String,
    pub ifttt_key: String,
    pub ifttt_event: String,
    pub pushover_user_key: String,
    pub pushover_app_key: String,
    pub ntfy_topic: String,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            notify_rip: true,
            notify_transcode: true,
            pushbullet_key: String::new(),
            ifttt_key: String::new(),
            ifttt_event: "arm_event".to_string(),
            pushover_user_key: String::new(),
            pushover_app_key: String::new(),
            ntfy_topic: String::new(),
        }
    }
}

/// Media server rescans
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    pub emby_refresh: bool,
    pub emby_server: String,
    pub emby_port: u16,
    pub emby_api_key: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            emby_refresh: false,
            emby_server: "localhost".to_string(),
            emby_port: 8096,
            emby_api_key: String::new(),
        }
    }
}

/// External binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub makemkvcon: String,
    pub handbrake_cli: String,
    pub abcde: String,
    pub dd: String,
    pub eject: String,
    pub udevadm: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            makemkvcon: "makemkvcon".to_string(),
            handbrake_cli: "HandBrakeCLI".to_string(),
            abcde: "abcde".to_string(),
            dd: "dd".to_string(),
            eject: "eject".to_string(),
            udevadm: "udevadm".to_string(),
        }
    }
}

/// Process logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_level: String,
    pub json: bool,
    /// Also write the process log to this file
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            log_file: None,
        }
    }
}

impl RipConfig {
    /// Reject values that would only fail halfway through a rip
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.paths.media_dir.as_os_str().is_empty() {
            return Err(DomainError::Config("paths.media_dir cannot be empty".to_string()));
        }
        if self.paths.raw_path.as_os_str().is_empty() {
            return Err(DomainError::Config("paths.raw_path cannot be empty".to_string()));
        }
        self.permissions.mode()?;
        if let Some(extras) = self.rip.extras_dir() {
            let mut parts = std::path::Path::new(extras).components();
            let single_name = matches!(
                (parts.next(), parts.next()),
                (Some(std::path::Component::Normal(_)), None)
            );
            if !single_name || extras.contains('\\') {
                return Err(DomainError::Config(format!(
                    "rip.extras_sub must be a single directory name: {}",
                    extras
                )));
            }
        }
        if self.rip.dest_ext.trim().is_empty() {
            return Err(DomainError::Config("rip.dest_ext cannot be empty".to_string()));
        }
        match self.logging.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(DomainError::Config(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }

    /// Log the effective configuration with secrets elided
    pub fn log_summary(&self) {
        tracing::info!("**** Effective configuration ****");
        tracing::info!(main_feature = self.rip.main_feature, rip_method = ?self.rip.rip_method, skip_transcode = self.rip.skip_transcode, delete_raw_files = self.rip.delete_raw_files, "rip");
        tracing::info!(min_length = self.rip.min_length, mkv_args = ?self.rip.mkv_args, extras_sub = %self.rip.extras_sub, dest_ext = %self.rip.dest_ext, "makemkv");
        tracing::info!(preset_dvd = %self.transcode.preset_dvd, preset_bd = %self.transcode.preset_bd, args_dvd = ?self.transcode.args_dvd, args_bd = ?self.transcode.args_bd, "handbrake");
        tracing::info!(raw_path = %self.paths.raw_path.display(), media_dir = %self.paths.media_dir.display(), music_dir = %self.paths.music_dir.display(), data_dir = %self.paths.data_dir.display(), log_path = %self.paths.log_path.display(), "paths");
        tracing::info!(emby_refresh = self.library.emby_refresh, emby_server = %self.library.emby_server, emby_port = self.library.emby_port, "library");
        tracing::info!(notify_rip = self.notify.notify_rip, notify_transcode = self.notify.notify_transcode, omdb_key_set = !self.metadata.omdb_api_key.is_empty(), "notify");
        tracing::info!("**** End of configuration ****");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(RipConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_octal_mode() {
        assert_eq!(parse_octal_mode("777").unwrap(), 0o777);
        assert_eq!(parse_octal_mode("0o755").unwrap(), 0o755);
        assert!(parse_octal_mode("999").is_err());
        assert!(parse_octal_mode("").is_err());
    }

    #[test]
    fn test_extras_dir_none_disables() {
        let mut rip = RipSettings::default();
        assert_eq!(rip.extras_dir(), Some("extras"));
        rip.extras_sub = "None".to_string();
        assert_eq!(rip.extras_dir(), None);
        rip.extras_sub = "  ".to_string();
        assert_eq!(rip.extras_dir(), None);
    }

    #[test]
    fn test_strategy_options_from_settings() {
        let mut rip = RipSettings::default();
        rip.main_feature = true;
        rip.rip_method = RipMethod::Backup;
        let options = rip.strategy_options();
        assert!(options.main_feature_only);
        assert!(options.backup_mode);
    }

    #[test]
    fn test_extras_sub_must_stay_inside_title_dir() {
        let mut config = RipConfig::default();
        for bad in ["../x", "/srv/extras", "extras/more", "..", "a\\b"] {
            config.rip.extras_sub = bad.to_string();
            assert!(
                matches!(config.validate(), Err(DomainError::Config(_))),
                "{} accepted",
                bad
            );
        }
        for good in ["extras", "Featurettes", "none"] {
            config.rip.extras_sub = good.to_string();
            assert!(config.validate().is_ok(), "{} rejected", good);
        }
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = RipConfig::default();
        config.logging.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(DomainError::Config(_))));
    }
}
