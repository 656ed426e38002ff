// HandBrake adapter - Per-title and main-feature transcodes through HandBrakeCLI

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TranscodeSettings;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Transcoder backed by `HandBrakeCLI`
pub struct HandBrakeAdapter {
    program: String,
    settings: TranscodeSettings,
    process: Arc<dyn ProcessPort>,
}

impl HandBrakeAdapter {
    pub fn new(
        program: impl Into<String>,
        settings: TranscodeSettings,
        process: Arc<dyn ProcessPort>,
    ) -> Self {
        Self {
            program: program.into(),
            settings,
            process,
        }
    }

    fn preset_for(&self, disc_type: DiscType) -> (&str, &[String]) {
        match disc_type {
            DiscType::Bluray => (&self.settings.preset_bd, &self.settings.args_bd),
            _ => (&self.settings.preset_dvd, &self.settings.args_dvd),
        }
    }

    pub fn command(&self, request: &TranscodeRequest) -> CommandSpec {
        let (preset, extra) = self.preset_for(request.disc_type);
        let mut spec = CommandSpec::new(&self.program)
            .arg("-i")
            .arg(&request.input)
            .arg("-o")
            .path_arg(&request.output);
        if request.main_feature {
            spec = spec.arg("--main-feature");
        }
        spec.arg("--preset")
            .arg(preset)
            .args(extra.iter().cloned())
            .log_to(request.log_file.clone())
    }
}

#[async_trait]
impl TranscoderPort for HandBrakeAdapter {
    async fn transcode(&self, request: &TranscodeRequest) -> Result<PathBuf, DomainError> {
        let spec = self.command(request);
        tracing::info!(input = %request.input, output = %request.output.display(), main_feature = request.main_feature, "Transcoding");
        tracing::debug!(command = %spec.display(), "HandBrake command");

        self.process
            .run(&spec)
            .await?
            .into_result(&self.program)?;
        Ok(request.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingProcess {
        status: i32,
        calls: Mutex<Vec<CommandSpec>>,
    }

    #[async_trait]
    impl ProcessPort for RecordingProcess {
        async fn run(&self, command: &CommandSpec) -> Result<ToolOutput, DomainError> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(ToolOutput {
                status: Some(self.status),
                ..Default::default()
            })
        }
    }

    fn settings() -> TranscodeSettings {
        TranscodeSettings {
            preset_dvd: "DVD Preset".to_string(),
            preset_bd: "BD Preset".to_string(),
            args_dvd: vec!["--subtitle".to_string(), "scan".to_string()],
            args_bd: Vec::new(),
        }
    }

    #[test]
    fn test_main_feature_command_uses_device() {
        let process = Arc::new(RecordingProcess {
            status: 0,
            calls: Mutex::new(Vec::new()),
        });
        let adapter = HandBrakeAdapter::new("HandBrakeCLI", settings(), process);
        let spec = adapter.command(&TranscodeRequest {
            input: "/dev/sr0".to_string(),
            output: PathBuf::from("/media/Shrek (2001)/Shrek (2001).mkv"),
            disc_type: DiscType::Dvd,
            main_feature: true,
            log_file: None,
        });
        assert_eq!(
            spec.args,
            vec![
                "-i",
                "/dev/sr0",
                "-o",
                "/media/Shrek (2001)/Shrek (2001).mkv",
                "--main-feature",
                "--preset",
                "DVD Preset",
                "--subtitle",
                "scan"
            ]
        );
    }

    #[test]
    fn test_bluray_uses_bd_preset() {
        let process = Arc::new(RecordingProcess {
            status: 0,
            calls: Mutex::new(Vec::new()),
        });
        let adapter = HandBrakeAdapter::new("HandBrakeCLI", settings(), process);
        let spec = adapter.command(&TranscodeRequest {
            input: "/raw/title_t00.mkv".to_string(),
            output: PathBuf::from("/stage/title_t00.mkv"),
            disc_type: DiscType::Bluray,
            main_feature: false,
            log_file: None,
        });
        assert_eq!(
            spec.args,
            vec!["-i", "/raw/title_t00.mkv", "-o", "/stage/title_t00.mkv", "--preset", "BD Preset"]
        );
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let process = Arc::new(RecordingProcess {
            status: 3,
            calls: Mutex::new(Vec::new()),
        });
        let adapter = HandBrakeAdapter::new("HandBrakeCLI", settings(), process);
        let err = adapter
            .transcode(&TranscodeRequest {
                input: "/raw/title_t01.mkv".to_string(),
                output: PathBuf::from("/stage/title_t01.mkv"),
                disc_type: DiscType::Dvd,
                main_feature: false,
                log_file: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ToolFailed { status: Some(3), .. }));
    }
}
