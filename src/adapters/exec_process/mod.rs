//! External process execution adapter
//!
//! Runs [`CommandSpec`] descriptors with `tokio::process`. Arguments are
//! passed as a vector, never through a shell.

use std::fs::OpenOptions;
use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Process execution adapter
pub struct ProcessAdapter;

impl ProcessAdapter {
    /// Create new process adapter
    pub fn new() -> Self {
        Self
    }

    fn log_stdio(spec: &CommandSpec) -> Result<Option<(Stdio, Stdio)>, DomainError> {
        let Some(path) = spec.log_file.as_ref() else {
            return Ok(None);
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to create log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                DomainError::FsFail(format!("Failed to open tool log {}: {}", path.display(), e))
            })?;
        let stderr = file
            .try_clone()
            .map_err(|e| DomainError::FsFail(format!("Failed to clone log handle: {}", e)))?;
        Ok(Some((Stdio::from(file), Stdio::from(stderr))))
    }
}

impl Default for ProcessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessPort for ProcessAdapter {
    async fn run(&self, spec: &CommandSpec) -> Result<ToolOutput, DomainError> {
        tracing::debug!(command = %spec.display(), "Running external tool");

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        let logged = Self::log_stdio(spec)?;
        let redirected = logged.is_some();
        match logged {
            Some((stdout, stderr)) => {
                command.stdout(stdout).stderr(stderr);
            }
            None => {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        let output = command.output().await.map_err(|e| {
            let reason = if e.kind() == io::ErrorKind::NotFound {
                "executable not found".to_string()
            } else {
                e.to_string()
            };
            DomainError::tool_start(&spec.program, reason)
        })?;

        let result = ToolOutput {
            status: output.status.code(),
            stdout: if redirected {
                String::new()
            } else {
                String::from_utf8_lossy(&output.stdout).into_owned()
            },
            stderr: if redirected {
                String::new()
            } else {
                String::from_utf8_lossy(&output.stderr).into_owned()
            },
        };
        tracing::debug!(program = %spec.program, status = ?result.status, "External tool exited");
        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_program_is_tool_start_failure() {
        let spec = CommandSpec::new("definitely-not-a-real-ripper-binary");
        let err = ProcessAdapter::new().run(&spec).await.unwrap_err();
        assert!(matches!(err, DomainError::ToolStart { .. }));
        assert!(err.is_run_fatal());
    }

    #[tokio::test]
    async fn test_captures_output_and_status() {
        let spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = ProcessAdapter::new().run(&spec).await.unwrap();
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_redirects_to_log_file() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("logs").join("disc.log");
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo ripping"])
            .log_to(Some(log.clone()));
        let output = ProcessAdapter::new().run(&spec).await.unwrap();
        assert!(output.success());
        assert!(output.stdout.is_empty());
        assert_eq!(std::fs::read_to_string(&log).unwrap().trim(), "ripping");
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        let spec = CommandSpec::new("sh")
            .args(["-c", "touch marker"])
            .current_dir(temp.path());
        ProcessAdapter::new().run(&spec).await.unwrap();
        assert!(temp.path().join("marker").exists());
    }
}
