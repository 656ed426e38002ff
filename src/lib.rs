//! autorip - Automatic optical disc ripper library
//!
//! Classifies the disc in an optical drive, picks a ripping strategy,
//! drives the external rip/transcode tools and files the results into a
//! media library layout.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use config::RipConfig;
pub use domain::errors::DomainError;
pub use domain::model::{DiscDescriptor, DiscType, RipStrategy, RunOutcome, RunState};
pub use error::{AutoripError, AutoripResult};
