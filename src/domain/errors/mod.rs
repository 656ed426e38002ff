// Domain errors - Error taxonomy for a single pipeline run

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Disc type could not be determined
    Classification(String),
    /// Metadata lookup returned nothing usable
    Lookup(String),
    /// External tool could not be launched
    ToolStart { tool: String, reason: String },
    /// External tool ran but exited unsuccessfully
    ToolFailed {
        tool: String,
        status: Option<i32>,
        detail: String,
    },
    /// A single title failed to transcode
    TitleTranscode { title: String, reason: String },
    /// A file could not be placed into the final layout
    Placement { path: String, reason: String },
    /// Permission normalisation failed
    Permissions(String),
    /// File system operation failed
    FsFail(String),
    /// Invalid configuration
    Config(String),
    /// Network or remote service error
    Network(String),
}

impl DomainError {
    /// Shorthand for a tool that could not be spawned
    pub fn tool_start(tool: impl Into<String>, reason: impl fmt::Display) -> Self {
        DomainError::ToolStart {
            tool: tool.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error ends the run it occurred in
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::Classification(_) | DomainError::ToolStart { .. }
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::Classification(msg) => write!(f, "Classification failed: {}", msg),
            DomainError::Lookup(msg) => write!(f, "Title lookup failed: {}", msg),
            DomainError::ToolStart { tool, reason } => {
                write!(f, "Could not start {}: {}", tool, reason)
            }
            DomainError::ToolFailed {
                tool,
                status,
                detail,
            } => match status {
                Some(code) => write!(f, "{} exited with code {}: {}", tool, code, detail),
                None => write!(f, "{} terminated by signal: {}", tool, detail),
            },
            DomainError::TitleTranscode { title, reason } => {
                write!(f, "Title {} failed to transcode: {}", title, reason)
            }
            DomainError::Placement { path, reason } => {
                write!(f, "Could not place {}: {}", path, reason)
            }
            DomainError::Permissions(msg) => write!(f, "Permission update failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
