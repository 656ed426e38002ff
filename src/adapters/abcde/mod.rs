// abcde adapter - Audio CD extraction

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Audio extractor backed by `abcde`, driven by its own configuration file
pub struct AbcdeAdapter {
    program: String,
    process: Arc<dyn ProcessPort>,
}

impl AbcdeAdapter {
    pub fn new(program: impl Into<String>, process: Arc<dyn ProcessPort>) -> Self {
        Self {
            program: program.into(),
            process,
        }
    }

    pub fn command(&self, device_path: &str, dest_dir: &Path, log_file: Option<&Path>) -> CommandSpec {
        // -N: non-interactive
        CommandSpec::new(&self.program)
            .args(["-d", device_path, "-N"])
            .current_dir(dest_dir)
            .log_to(log_file.map(Path::to_path_buf))
    }
}

#[async_trait]
impl AudioExtractorPort for AbcdeAdapter {
    async fn extract(
        &self,
        device_path: &str,
        dest_dir: &Path,
        log_file: Option<&Path>,
    ) -> Result<(), DomainError> {
        let spec = self.command(device_path, dest_dir, log_file);
        tracing::debug!(command = %spec.display(), "Sending command");
        self.process
            .run(&spec)
            .await?
            .into_result(&self.program)?;
        tracing::info!("abcde call successful");
        Ok(())
    }
}
