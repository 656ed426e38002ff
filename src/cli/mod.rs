//! CLI module for autorip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// autorip - unattended optical disc ingestion
///
/// Classifies the disc in a drive, rips and transcodes it with external tools,
/// and files the results into a media library.
#[derive(Parser, Debug)]
#[command(name = "autorip")]
#[command(about = "Automatic optical disc ripper - classify, rip, transcode and file discs")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: /etc/autorip/autorip.toml, then ./autorip.toml)
    #[arg(long, global = true, env = "AUTORIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rip the disc in a drive from start to finish
    Rip(args::RipArgs),
    /// Classify a disc and look up its title without ripping
    Identify(args::IdentifyArgs),
    /// Run the title lookup for a disc label
    Lookup(args::LookupArgs),
    /// Show the drive status
    Status(args::StatusArgs),
}
