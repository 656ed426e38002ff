//! Command-line argument definitions

use clap::Args;

/// Arguments for the rip command
#[derive(Args, Debug)]
pub struct RipArgs {
    /// Device path of the optical drive
    #[arg(short, long)]
    pub devpath: String,

    /// Transcode only the main feature of DVDs
    #[arg(long)]
    pub main_feature: bool,

    /// Place raw rips without transcoding
    #[arg(long)]
    pub skip_transcode: bool,
}

/// Arguments for the identify command
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Device path of the optical drive
    #[arg(short, long)]
    pub devpath: String,
}

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Disc volume label, e.g. THE_MATRIX
    #[arg(short, long)]
    pub label: String,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Device path of the optical drive
    #[arg(short, long)]
    pub devpath: String,
}
