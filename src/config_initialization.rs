//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::info;

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::cli::{Cli, Commands};
use crate::config::{RipConfig, RipMethod};
use crate::error::{AutoripError, AutoripResult};

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
///
/// Runs before logging is installed, so the returned config's own
/// `log_summary` is the first record of what was loaded.
pub fn initialize_configuration_hierarchy(cli: &Cli) -> AutoripResult<RipConfig> {
    // Step 1 + 2: defaults, overlaid by the config file when there is one
    let mut config = match cli.config.clone().or_else(TomlConfigAdapter::discover) {
        Some(path) => TomlConfigAdapter::load(&path)?,
        None => RipConfig::default(),
    };

    // Step 3: environment variables
    let env_overrides = apply_environment_overrides(&mut config, |var| std::env::var(var).ok())?;

    // Step 4: CLI arguments
    let cli_overrides = apply_cli_configuration_overrides(&mut config, cli);

    config.validate()?;
    info!(env_overrides, cli_overrides, "Configuration hierarchy initialized");
    Ok(config)
}

/// Apply `AUTORIP_*` variables from `lookup`; returns how many were applied
pub fn apply_environment_overrides<F>(config: &mut RipConfig, lookup: F) -> AutoripResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;
    let mut get = |var: &str| {
        let value = lookup(var).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            applied += 1;
        }
        value
    };

    if let Some(v) = get("AUTORIP_RAW_PATH") {
        config.paths.raw_path = PathBuf::from(v);
    }
    if let Some(v) = get("AUTORIP_MEDIA_DIR") {
        config.paths.media_dir = PathBuf::from(v);
    }
    if let Some(v) = get("AUTORIP_MUSIC_DIR") {
        config.paths.music_dir = PathBuf::from(v);
    }
    if let Some(v) = get("AUTORIP_DATA_DIR") {
        config.paths.data_dir = PathBuf::from(v);
    }
    if let Some(v) = get("AUTORIP_LOG_PATH") {
        config.paths.log_path = PathBuf::from(v);
    }
    if let Some(v) = get("AUTORIP_MAIN_FEATURE") {
        config.rip.main_feature = parse_bool("AUTORIP_MAIN_FEATURE", &v)?;
    }
    if let Some(v) = get("AUTORIP_SKIP_TRANSCODE") {
        config.rip.skip_transcode = parse_bool("AUTORIP_SKIP_TRANSCODE", &v)?;
    }
    if let Some(v) = get("AUTORIP_DELETE_RAW_FILES") {
        config.rip.delete_raw_files = parse_bool("AUTORIP_DELETE_RAW_FILES", &v)?;
    }
    if let Some(v) = get("AUTORIP_RIP_METHOD") {
        config.rip.rip_method = RipMethod::parse(&v).map_err(|_| invalid_env("AUTORIP_RIP_METHOD", &v))?;
    }
    if let Some(v) = get("AUTORIP_MIN_LENGTH") {
        config.rip.min_length = v
            .trim()
            .parse()
            .map_err(|_| invalid_env("AUTORIP_MIN_LENGTH", &v))?;
    }
    if let Some(v) = get("AUTORIP_OMDB_API_KEY") {
        config.metadata.omdb_api_key = v;
    }
    if let Some(v) = get("AUTORIP_LOG_LEVEL") {
        config.logging.log_level = v.trim().to_lowercase();
    }
    if let Some(v) = get("AUTORIP_LOG_JSON") {
        config.logging.json = parse_bool("AUTORIP_LOG_JSON", &v)?;
    }

    Ok(applied)
}

/// Apply CLI flags on top of everything else; returns how many were applied
pub fn apply_cli_configuration_overrides(config: &mut RipConfig, cli: &Cli) -> usize {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        config.logging.log_level = level.to_lowercase();
        applied += 1;
    }

    if let Commands::Rip(args) = &cli.command {
        if args.main_feature {
            config.rip.main_feature = true;
            applied += 1;
        }
        if args.skip_transcode {
            config.rip.skip_transcode = true;
            applied += 1;
        }
    }

    applied
}

fn parse_bool(var: &str, value: &str) -> AutoripResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_env(var, value)),
    }
}

fn invalid_env(var: &str, value: &str) -> AutoripError {
    AutoripError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    }
}
