// udev inspector adapter - Disc classification from udev device properties

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Disc inspector that reads `udevadm info --query=property`
pub struct UdevInspectorAdapter {
    program: String,
    process: Arc<dyn ProcessPort>,
}

impl UdevInspectorAdapter {
    pub fn new(program: impl Into<String>, process: Arc<dyn ProcessPort>) -> Self {
        Self {
            program: program.into(),
            process,
        }
    }
}

/// Parse `KEY=VALUE` lines into a property map
pub fn parse_properties(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Classify a disc from its udev properties.
///
/// Blu-ray wins over DVD, DVD over audio tracks, and an ISO9660 file system
/// with none of those marks a data disc.
pub fn classify_properties(properties: &HashMap<String, String>) -> DiscIdentity {
    let flag = |key: &str| properties.get(key).is_some_and(|v| !v.is_empty() && v != "0");

    let disc_type = if flag("ID_CDROM_MEDIA_BD") {
        DiscType::Bluray
    } else if flag("ID_CDROM_MEDIA_DVD") {
        DiscType::Dvd
    } else if flag("ID_CDROM_MEDIA_TRACK_COUNT_AUDIO") {
        DiscType::Music
    } else if properties
        .get("ID_FS_TYPE")
        .is_some_and(|fs| fs.eq_ignore_ascii_case("iso9660"))
    {
        DiscType::Data
    } else {
        DiscType::Unknown
    };

    DiscIdentity {
        disc_type,
        label: properties.get("ID_FS_LABEL").cloned().unwrap_or_default(),
    }
}

#[async_trait]
impl DiscInspectorPort for UdevInspectorAdapter {
    async fn classify(&self, device_path: &str) -> Result<DiscIdentity, DomainError> {
        let name = format!("--name={}", device_path);
        let spec = CommandSpec::new(&self.program).args(["info", "--query=property", name.as_str()]);
        let output = self.process.run(&spec).await?.into_result(&self.program)?;
        let properties = parse_properties(&output.stdout);

        tracing::debug!("**** Logging udev attributes ****");
        let mut keys: Vec<_> = properties.iter().collect();
        keys.sort();
        for (key, value) in keys {
            tracing::debug!("{}:{}", key, value);
        }
        tracing::debug!("**** End udev attributes ****");

        let identity = classify_properties(&properties);
        tracing::info!(device = device_path, disc_type = %identity.disc_type, label = %identity.label, "Disc classified");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_properties() {
        let parsed = parse_properties("DEVNAME=/dev/sr0\nID_FS_LABEL=THE_MATRIX\nnot a property\n");
        assert_eq!(parsed.get("DEVNAME").map(String::as_str), Some("/dev/sr0"));
        assert_eq!(parsed.get("ID_FS_LABEL").map(String::as_str), Some("THE_MATRIX"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_bluray_beats_dvd() {
        let identity = classify_properties(&props(&[
            ("ID_CDROM_MEDIA_DVD", "1"),
            ("ID_CDROM_MEDIA_BD", "1"),
            ("ID_FS_TYPE", "udf"),
            ("ID_FS_LABEL", "THE_MATRIX"),
        ]));
        assert_eq!(identity.disc_type, DiscType::Bluray);
        assert_eq!(identity.label, "THE_MATRIX");
    }

    #[test]
    fn test_dvd_with_iso9660_is_video() {
        let identity = classify_properties(&props(&[
            ("ID_CDROM_MEDIA_DVD", "1"),
            ("ID_FS_TYPE", "iso9660"),
        ]));
        assert_eq!(identity.disc_type, DiscType::Dvd);
    }

    #[test]
    fn test_audio_cd() {
        let identity = classify_properties(&props(&[("ID_CDROM_MEDIA_TRACK_COUNT_AUDIO", "12")]));
        assert_eq!(identity.disc_type, DiscType::Music);
        assert_eq!(identity.label, "");
    }

    #[test]
    fn test_data_disc() {
        let identity = classify_properties(&props(&[
            ("ID_CDROM_MEDIA_CD", "1"),
            ("ID_FS_TYPE", "iso9660"),
            ("ID_FS_LABEL", "BACKUP_2019"),
        ]));
        assert_eq!(identity.disc_type, DiscType::Data);
    }

    #[test]
    fn test_unknown_without_media_marks() {
        let identity = classify_properties(&props(&[("ID_CDROM", "1"), ("ID_CDROM_MEDIA_BD", "0")]));
        assert_eq!(identity.disc_type, DiscType::Unknown);
    }
}
