// Adapters - External system implementations

pub mod abcde;
pub mod dd_copy;
pub mod drive_linux;
pub mod emby;
pub mod exec_process;
pub mod fs_local;
pub mod handbrake;
pub mod makemkv;
pub mod notify;
pub mod omdb;
pub mod toml_config;
pub mod tracing_log;
pub mod udev_inspector;

// Re-export adapters
pub use abcde::AbcdeAdapter;
pub use dd_copy::DdCopyAdapter;
pub use drive_linux::DriveAdapter;
pub use emby::EmbyRescanAdapter;
pub use exec_process::ProcessAdapter;
pub use fs_local::LocalFsAdapter;
pub use handbrake::HandBrakeAdapter;
pub use makemkv::MakeMkvAdapter;
pub use notify::PushNotifier;
pub use omdb::OmdbClient;
pub use toml_config::TomlConfigAdapter;
pub use udev_inspector::UdevInspectorAdapter;
