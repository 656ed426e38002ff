// dd adapter - Raw byte copy of data discs into an image file

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Optical sector size
const SECTOR_SIZE: u32 = 2048;

/// Byte copier backed by `dd`
pub struct DdCopyAdapter {
    program: String,
    process: Arc<dyn ProcessPort>,
}

impl DdCopyAdapter {
    pub fn new(program: impl Into<String>, process: Arc<dyn ProcessPort>) -> Self {
        Self {
            program: program.into(),
            process,
        }
    }

    pub fn command(&self, device_path: &str, dest_file: &Path, log_file: Option<&Path>) -> CommandSpec {
        CommandSpec::new(&self.program)
            .arg(format!("if={}", device_path))
            .arg(format!("of={}", dest_file.display()))
            .arg(format!("bs={}", SECTOR_SIZE))
            .log_to(log_file.map(Path::to_path_buf))
    }
}

#[async_trait]
impl ByteCopyPort for DdCopyAdapter {
    async fn copy(
        &self,
        device_path: &str,
        dest_file: &Path,
        log_file: Option<&Path>,
    ) -> Result<(), DomainError> {
        tracing::info!(image = %dest_file.display(), "Ripping data disc");
        let spec = self.command(device_path, dest_file, log_file);
        tracing::debug!(command = %spec.display(), "Sending command");
        self.process
            .run(&spec)
            .await?
            .into_result(&self.program)?;
        tracing::info!("Data rip call successful");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingProcess {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ProcessPort for FailingProcess {
        async fn run(&self, _command: &CommandSpec) -> Result<ToolOutput, DomainError> {
            *self.calls.lock().unwrap() += 1;
            Ok(ToolOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: "dd: error reading '/dev/sr0': Input/output error".to_string(),
            })
        }
    }

    #[test]
    fn test_command_arguments() {
        let adapter = DdCopyAdapter::new(
            "dd",
            Arc::new(FailingProcess {
                calls: Mutex::new(0),
            }),
        );
        let spec = adapter.command("/dev/sr0", Path::new("/data/datadisc/datadisc.iso"), None);
        assert_eq!(
            spec.args,
            vec!["if=/dev/sr0", "of=/data/datadisc/datadisc.iso", "bs=2048"]
        );
    }

    #[tokio::test]
    async fn test_read_error_is_reported() {
        let process = Arc::new(FailingProcess {
            calls: Mutex::new(0),
        });
        let adapter = DdCopyAdapter::new("dd", Arc::clone(&process) as Arc<dyn ProcessPort>);
        let err = adapter
            .copy("/dev/sr0", Path::new("/data/x.iso"), None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "dd exited with code 1: dd: error reading '/dev/sr0': Input/output error"
        );
        assert_eq!(*process.calls.lock().unwrap(), 1);
    }
}
