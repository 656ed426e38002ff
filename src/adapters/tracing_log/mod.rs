// Tracing log adapter - Subscriber installation for the process log

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;
use crate::error::{AutoripError, AutoripResult};

/// `RUST_LOG` when set, otherwise the configured level for this crate
pub fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber: stderr, plus the optional log file
pub fn init_tracing(settings: &LoggingSettings) -> AutoripResult<()> {
    let file = match &settings.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| AutoripError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| AutoripError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(file)
        }
        None => None,
    };

    let filter = build_env_filter(&settings.log_level);
    let installed = if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(file.map(|f| fmt::layer().json().with_writer(Mutex::new(f))))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(file.map(|f| {
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(f))
            }))
            .try_init()
    };

    installed.map_err(|e| AutoripError::Logging {
        message: e.to_string(),
    })
}
