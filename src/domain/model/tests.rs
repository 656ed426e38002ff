// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::errors::*;
    use crate::domain::model::*;

    fn matrix_match() -> TitleResolution {
        TitleResolution::Resolved {
            query: "The+Matrix".to_string(),
            matched: TitleMatch {
                title: Some("The Matrix".to_string()),
                year: "1999".to_string(),
                category: VideoCategory::Movie,
            },
            attempts: 2,
        }
    }

    #[test]
    fn test_disc_type_parse() {
        assert_eq!(DiscType::parse("DVD").unwrap(), DiscType::Dvd);
        assert_eq!(DiscType::parse("bluray").unwrap(), DiscType::Bluray);
        assert_eq!(DiscType::parse(" music ").unwrap(), DiscType::Music);
        assert!(DiscType::parse("laserdisc").is_err());
    }

    #[test]
    fn test_video_category_from_service_type() {
        assert_eq!(VideoCategory::from_service_type("movie"), VideoCategory::Movie);
        assert_eq!(VideoCategory::from_service_type("Series"), VideoCategory::Series);
        assert_eq!(VideoCategory::from_service_type("game"), VideoCategory::Unknown);
    }

    #[test]
    fn test_drive_status_from_ioctl() {
        assert_eq!(DriveStatus::from_ioctl(1), DriveStatus::NoDisc);
        assert_eq!(DriveStatus::from_ioctl(2), DriveStatus::TrayOpen);
        assert_eq!(DriveStatus::from_ioctl(3), DriveStatus::NotReady);
        assert_eq!(DriveStatus::from_ioctl(4), DriveStatus::Ready);
        assert_eq!(DriveStatus::from_ioctl(0), DriveStatus::NotReady);
    }

    #[test]
    fn test_descriptor_defaults() {
        let disc = DiscDescriptor::classified("/dev/sr0", DiscType::Dvd, " THE_MATRIX ");
        assert_eq!(disc.label(), "THE_MATRIX");
        assert_eq!(disc.video_title(), "THE_MATRIX");
        assert_eq!(disc.video_year(), "");
        assert_eq!(disc.video_category(), VideoCategory::Unknown);
        assert!(!disc.has_resolved_title());
        assert!(disc.errors().is_empty());
    }

    #[test]
    fn test_descriptor_applies_resolution() {
        let mut disc = DiscDescriptor::classified("/dev/sr0", DiscType::Bluray, "THE_MATRIX");
        disc.apply_resolution(&matrix_match());
        assert!(disc.has_resolved_title());
        assert_eq!(disc.video_title(), "The Matrix");
        assert_eq!(disc.destination_name(), "The Matrix (1999)");
        assert_eq!(disc.placement_category(), VideoCategory::Movie);
    }

    #[test]
    fn test_descriptor_ignores_resolution_for_non_video() {
        let mut disc = DiscDescriptor::classified("/dev/sr0", DiscType::Music, "Album");
        disc.apply_resolution(&matrix_match());
        assert!(!disc.has_resolved_title());
        assert_eq!(disc.video_title(), "");
    }

    #[test]
    fn test_unresolved_descriptor_falls_back_to_label() {
        let mut disc = DiscDescriptor::classified("/dev/sr0", DiscType::Dvd, "MYSTERY_DISC");
        disc.apply_resolution(&TitleResolution::Unresolved { attempts: 3 });
        assert!(!disc.has_resolved_title());
        assert_eq!(disc.destination_name(), "MYSTERY_DISC");
        assert_eq!(disc.placement_category(), VideoCategory::Unknown);
    }

    #[test]
    fn test_errors_are_append_only() {
        let mut disc = DiscDescriptor::classified("/dev/sr0", DiscType::Bluray, "X");
        disc.record_error("title_t00.mkv");
        disc.record_error("title_t03.mkv");
        assert_eq!(disc.errors(), ["title_t00.mkv", "title_t03.mkv"]);
    }

    #[test]
    fn test_placeholder_for_empty_label() {
        let disc = DiscDescriptor::classified("/dev/sr0", DiscType::Data, "");
        assert_eq!(disc.label_or_placeholder(), DATA_DISC_PLACEHOLDER);
        assert_eq!(disc.display_name(), DATA_DISC_PLACEHOLDER);
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(
            DiscDescriptor::classified("/dev/sr0", DiscType::Dvd, "SHREK").log_file_name(),
            "SHREK.log"
        );
        assert_eq!(
            DiscDescriptor::classified("/dev/sr0", DiscType::Music, "").log_file_name(),
            "music_cd.log"
        );
        assert_eq!(
            DiscDescriptor::classified("/dev/sr0", DiscType::Bluray, "").log_file_name(),
            "bluray.log"
        );
        assert_eq!(
            DiscDescriptor::classified("/dev/sr0", DiscType::Unknown, "").log_file_name(),
            "empty.log"
        );
    }

    #[test]
    fn test_output_file_set() {
        let set = OutputFileSet::new(
            "/raw/disc",
            vec![OutputFile::new("a.mkv", 10), OutputFile::new("b.mkv", 32)],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_size(), 42);
        assert_eq!(
            set.path_of(&set.files[1]),
            std::path::PathBuf::from("/raw/disc/b.mkv")
        );
    }

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("makemkvcon")
            .args(["mkv", "-r"])
            .arg("dev:/dev/sr0")
            .path_arg(std::path::Path::new("/raw/out dir"));
        assert_eq!(spec.args, vec!["mkv", "-r", "dev:/dev/sr0", "/raw/out dir"]);
        assert_eq!(spec.display(), "makemkvcon mkv -r dev:/dev/sr0 /raw/out dir");
    }

    #[test]
    fn test_tool_output_into_result() {
        let ok = ToolOutput {
            status: Some(0),
            ..Default::default()
        };
        assert!(ok.into_result("dd").is_ok());

        let failed = ToolOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "reading\ndd: /dev/sr0: Input/output error\n\n".to_string(),
        };
        match failed.into_result("dd").unwrap_err() {
            DomainError::ToolFailed { tool, status, detail } => {
                assert_eq!(tool, "dd");
                assert_eq!(status, Some(1));
                assert_eq!(detail, "dd: /dev/sr0: Input/output error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_outcome_success() {
        let mut outcome = RunOutcome {
            device_path: "/dev/sr0".to_string(),
            disc_type: DiscType::Dvd,
            strategy: Some(RipStrategy::FullDiscMkv),
            states: vec![RunState::Classified, RunState::Finalized],
            errors: Vec::new(),
            fatal: None,
            placement: None,
            destination: None,
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.final_state(), Some(RunState::Finalized));
        outcome.errors.push("title_t01.mkv".to_string());
        assert!(!outcome.is_success());
    }
}
