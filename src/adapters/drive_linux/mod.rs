// Drive adapter - Optical drive status via ioctl and tray control via eject

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// `CDROM_DRIVE_STATUS` request number from linux/cdrom.h
#[cfg(target_os = "linux")]
const CDROM_DRIVE_STATUS: u64 = 0x5326;

/// Optical drive adapter
pub struct DriveAdapter {
    eject_program: String,
    process: Arc<dyn ProcessPort>,
}

impl DriveAdapter {
    pub fn new(eject_program: impl Into<String>, process: Arc<dyn ProcessPort>) -> Self {
        Self {
            eject_program: eject_program.into(),
            process,
        }
    }
}

#[cfg(target_os = "linux")]
fn read_drive_status(device_path: &str) -> Result<i32, DomainError> {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    // Non-blocking so an empty drive does not stall the open
    let device = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(device_path)
        .map_err(|e| DomainError::FsFail(format!("Failed to open {}: {}", device_path, e)))?;

    // SAFETY: the descriptor stays open for the duration of the call and
    // CDROM_DRIVE_STATUS takes an integer slot argument, not a pointer.
    let status = unsafe { libc::ioctl(device.as_raw_fd(), CDROM_DRIVE_STATUS as _, 0) };
    if status < 0 {
        return Err(DomainError::FsFail(format!(
            "CDROM_DRIVE_STATUS failed on {}: {}",
            device_path,
            io::Error::last_os_error()
        )));
    }
    Ok(status)
}

#[cfg(not(target_os = "linux"))]
fn read_drive_status(device_path: &str) -> Result<i32, DomainError> {
    Err(DomainError::FsFail(format!(
        "Drive status for {} is only available on Linux",
        device_path
    )))
}

#[async_trait]
impl DrivePort for DriveAdapter {
    async fn status(&self, device_path: &str) -> Result<DriveStatus, DomainError> {
        let path = device_path.to_string();
        let code = tokio::task::spawn_blocking(move || read_drive_status(&path))
            .await
            .map_err(|e| DomainError::FsFail(format!("Drive status task failed: {}", e)))??;
        let status = DriveStatus::from_ioctl(code);
        tracing::debug!(device = device_path, code, status = %status, "Drive status");
        Ok(status)
    }

    async fn eject(&self, device_path: &str) -> Result<(), DomainError> {
        if self.status(device_path).await.ok() == Some(DriveStatus::TrayOpen) {
            tracing::debug!(device = device_path, "Tray is already open. Skipping eject.");
            return Ok(());
        }
        let spec = CommandSpec::new(&self.eject_program).arg(device_path);
        tracing::debug!(command = %spec.display(), "Ejecting");
        self.process
            .run(&spec)
            .await?
            .into_result(&self.eject_program)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingProcess {
        calls: Mutex<Vec<CommandSpec>>,
    }

    #[async_trait]
    impl ProcessPort for RecordingProcess {
        async fn run(&self, command: &CommandSpec) -> Result<ToolOutput, DomainError> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(ToolOutput {
                status: Some(0),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_status_of_missing_device_is_error() {
        let process = Arc::new(RecordingProcess {
            calls: Mutex::new(Vec::new()),
        });
        let drive = DriveAdapter::new("eject", process);
        assert!(drive.status("/dev/no-such-drive").await.is_err());
    }

    #[tokio::test]
    async fn test_eject_runs_when_status_unknown() {
        let process = Arc::new(RecordingProcess {
            calls: Mutex::new(Vec::new()),
        });
        let drive = DriveAdapter::new("eject", Arc::clone(&process) as Arc<dyn ProcessPort>);
        drive.eject("/dev/no-such-drive").await.unwrap();
        let calls = process.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].display(), "eject /dev/no-such-drive");
    }
}
