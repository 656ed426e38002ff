// Rip interactor - Orchestrates one disc run from strategy selection to final notification

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::placement::{OutputPlacement, PlacementTarget};
use crate::config::RipConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Title used for every notification
pub const NOTIFY_TITLE: &str = "autorip notification";

/// Collaborators used by a run
#[derive(Clone)]
pub struct RipPorts {
    pub drive: Arc<dyn DrivePort>,
    pub ripper: Arc<dyn RipperPort>,
    pub transcoder: Arc<dyn TranscoderPort>,
    pub audio: Arc<dyn AudioExtractorPort>,
    pub byte_copy: Arc<dyn ByteCopyPort>,
    pub notifier: Arc<dyn NotifyPort>,
    pub library: Arc<dyn LibraryRescanPort>,
    pub fs: Arc<dyn FsPort>,
}

/// What the rip stage left for placement
enum Staged {
    /// The tool wrote its final output directly
    Direct { destination: PathBuf },
    /// Files waiting to be placed
    Files {
        files: OutputFileSet,
        raw_dir: PathBuf,
        staging_dir: Option<PathBuf>,
        /// Every raw input made it into `files`
        raw_consumed: bool,
        target: PlacementTarget,
    },
    /// A disc backup tree moved whole into the title directory
    Tree { raw_dir: PathBuf, dest_dir: PathBuf },
}

/// Mutable state of one run, owned by the interactor for its duration
struct Run {
    disc: DiscDescriptor,
    states: Vec<RunState>,
    strategy: Option<RipStrategy>,
    placement: Option<PlacementReport>,
    destination: Option<PathBuf>,
    log_file: PathBuf,
}

impl Run {
    fn enter(&mut self, state: RunState) {
        tracing::debug!(state = ?state, "Run state");
        self.states.push(state);
    }

    fn into_outcome(self, fatal: Option<DomainError>) -> RunOutcome {
        RunOutcome {
            device_path: self.disc.device_path().to_string(),
            disc_type: self.disc.disc_type(),
            strategy: self.strategy,
            states: self.states,
            errors: self.disc.errors().to_vec(),
            fatal,
            placement: self.placement,
            destination: self.destination,
        }
    }
}

/// Pipeline orchestrator
pub struct RipInteractor {
    ports: RipPorts,
    config: Arc<RipConfig>,
    placement: OutputPlacement,
}

impl RipInteractor {
    pub fn new(ports: RipPorts, config: Arc<RipConfig>) -> Self {
        let placement = OutputPlacement::new(Arc::clone(&ports.fs));
        Self {
            ports,
            config,
            placement,
        }
    }

    /// Execute one run. Never fails: every collaborator error ends up in the outcome.
    pub async fn execute(&self, disc: DiscDescriptor) -> RunOutcome {
        log_descriptor(&disc);
        let log_file = self.config.paths.log_path.join(disc.log_file_name());
        let mut run = Run {
            disc,
            states: vec![RunState::Classified],
            strategy: None,
            placement: None,
            destination: None,
            log_file,
        };

        let strategy = match StrategySelector::select(
            run.disc.disc_type(),
            self.config.rip.strategy_options(),
        ) {
            Ok(strategy) => strategy,
            Err(e) => {
                tracing::info!("Couldn't identify the disc type. Exiting without any action.");
                self.notify(&format!(
                    "Could not identify disc at {}. No action taken.",
                    run.disc.device_path()
                ))
                .await;
                run.enter(RunState::Finalized);
                return run.into_outcome(Some(e));
            }
        };
        tracing::info!(device = run.disc.device_path(), strategy = %strategy, "Rip strategy selected");
        run.strategy = Some(strategy);
        run.enter(RunState::StrategySelected);

        self.notify_start(&run.disc).await;

        run.enter(RunState::Ripping);
        let staged = match self.rip_stage(strategy, &mut run).await {
            Ok(staged) => staged,
            Err(e) => return self.finish_fatal(run, e).await,
        };

        run.enter(RunState::Placing);
        match staged {
            Staged::Direct { destination } => run.destination = Some(destination),
            Staged::Files {
                files,
                raw_dir,
                staging_dir,
                raw_consumed,
                target,
            } => {
                tracing::info!(dest = %target.dest_dir.display(), files = files.len(), "Processing files");
                let report = self.placement.place(&files, &target).await;
                for failure in &report.failed {
                    tracing::warn!(error = %failure, "Placement failure");
                }
                run.placement = Some(report);
                run.destination = Some(target.dest_dir);

                if self.config.rip.delete_raw_files {
                    let mut doomed: Vec<&PathBuf> = staging_dir.iter().collect();
                    if raw_consumed {
                        doomed.push(&raw_dir);
                    } else {
                        tracing::info!(path = %raw_dir.display(), "Keeping raw files; not every input was transcoded");
                    }
                    for dir in doomed {
                        if let Err(e) = self.ports.fs.delete_directory(dir).await {
                            tracing::warn!(path = %dir.display(), error = %e, "Failed to delete raw files");
                        }
                    }
                }
            }
            Staged::Tree { raw_dir, dest_dir } => {
                let report = self.placement.place_tree(&raw_dir, &dest_dir).await;
                if !report.failed.is_empty() {
                    run.disc.record_error(run.disc.display_name().to_string());
                }
                run.placement = Some(report);
                run.destination = Some(dest_dir);
            }
        }

        if strategy != RipStrategy::MusicExtract {
            self.apply_permissions(run.destination.as_deref()).await;
        }

        run.enter(RunState::Finalized);
        self.notify_completion(&run.disc).await;
        run.into_outcome(None)
    }

    async fn rip_stage(&self, strategy: RipStrategy, run: &mut Run) -> Result<Staged, DomainError> {
        match strategy {
            RipStrategy::MainFeatureOnly => self.rip_main_feature(run).await,
            RipStrategy::FullDiscMkv | RipStrategy::FullDiscBackup => {
                self.rip_full_disc(strategy, run).await
            }
            RipStrategy::MusicExtract => self.rip_music(run).await,
            RipStrategy::DataCopy => self.rip_data(run).await,
        }
    }

    /// Transcode the main feature straight from the drive into the media directory
    async fn rip_main_feature(&self, run: &mut Run) -> Result<Staged, DomainError> {
        let name = run.disc.destination_name();
        let dest_dir = self.config.paths.media_dir.join(&name);
        self.ports.fs.create_directory(&dest_dir).await?;

        let request = TranscodeRequest {
            input: run.disc.device_path().to_string(),
            output: dest_dir.join(format!("{}.{}", name, self.config.rip.dest_ext)),
            disc_type: run.disc.disc_type(),
            main_feature: true,
            log_file: Some(run.log_file.clone()),
        };
        match self.ports.transcoder.transcode(&request).await {
            Ok(path) => tracing::info!(path = %path.display(), "Main feature transcoded"),
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Main feature transcode failed");
                run.disc.record_error(name.clone());
            }
        }
        self.eject(run.disc.device_path()).await;
        Ok(Staged::Direct {
            destination: dest_dir,
        })
    }

    /// Rip every title, transcode each one unless configured otherwise, and stage the result
    async fn rip_full_disc(&self, strategy: RipStrategy, run: &mut Run) -> Result<Staged, DomainError> {
        let name = run.disc.destination_name();
        let raw_dir = self
            .ports
            .fs
            .create_unique_directory(&self.config.paths.raw_path.join(&name))
            .await?;
        let dest_dir = self.config.paths.media_dir.join(&name);
        self.ports.fs.create_directory(&dest_dir).await?;

        tracing::info!(method = %strategy, dest = %raw_dir.display(), "Starting MakeMKV rip");
        let request = RipRequest {
            device_path: run.disc.device_path().to_string(),
            disc_type: run.disc.disc_type(),
            strategy,
            dest_dir: raw_dir.clone(),
            log_file: Some(run.log_file.clone()),
        };
        let ripped = match self.ports.ripper.rip(&request).await {
            Ok(files) => Some(files),
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Rip did not complete successfully");
                run.disc.record_error(e.to_string());
                None
            }
        };
        self.eject(run.disc.device_path()).await;

        let skip_transcode = self.config.rip.skip_transcode;
        if self.config.notify.notify_rip {
            let body = if skip_transcode {
                format!("{} rip complete.", run.disc.display_name())
            } else {
                format!("{} rip complete. Starting transcode.", run.disc.display_name())
            };
            self.notify(&body).await;
        }

        if strategy == RipStrategy::FullDiscBackup {
            return self.stage_backup(run, raw_dir, dest_dir, &name).await;
        }

        let raw_files = match ripped {
            Some(files) => files,
            // Keep whatever titles made it to disk
            None => self.ports.fs.list_files(&raw_dir).await?,
        };
        tracing::info!(files = raw_files.len(), bytes = raw_files.total_size(), "Rip finished");
        if raw_files.is_empty() {
            tracing::warn!(dest = %raw_dir.display(), "Rip produced no titles");
            run.disc.record_error(name.clone());
        }

        let (files, staging_dir, raw_consumed) = if skip_transcode {
            tracing::info!("skip_transcode is true. Placing raw files.");
            (raw_files, None, true)
        } else {
            let staging = self.create_staging(&name).await?;
            let (transcoded, failed) = self.transcode_titles(run, &raw_files, &staging).await?;
            (transcoded, Some(staging), failed == 0)
        };

        Ok(Staged::Files {
            files,
            raw_dir,
            staging_dir,
            raw_consumed,
            target: self.placement_target(&run.disc, dest_dir, &name),
        })
    }

    /// A backup is a disc tree rather than a set of titles: it is transcoded
    /// as one main-feature input, or moved whole when transcoding is skipped
    async fn stage_backup(
        &self,
        run: &mut Run,
        raw_dir: PathBuf,
        dest_dir: PathBuf,
        name: &str,
    ) -> Result<Staged, DomainError> {
        if self.config.rip.skip_transcode {
            tracing::info!("skip_transcode is true. Placing disc backup.");
            return Ok(Staged::Tree { raw_dir, dest_dir });
        }

        let staging = self.create_staging(name).await?;
        let request = TranscodeRequest {
            input: raw_dir.to_string_lossy().to_string(),
            output: staging.join(format!("{}.{}", name, self.config.rip.dest_ext)),
            disc_type: run.disc.disc_type(),
            main_feature: true,
            log_file: Some(run.log_file.clone()),
        };
        let transcoded = match self.ports.transcoder.transcode(&request).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Disc backup transcoded");
                true
            }
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(error = %e, "Disc backup transcode failed");
                run.disc.record_error(name.to_string());
                false
            }
        };
        self.notify_transcoded(&run.disc, usize::from(transcoded), 1).await;

        Ok(Staged::Files {
            files: self.ports.fs.list_files(&staging).await?,
            raw_dir,
            staging_dir: Some(staging),
            raw_consumed: transcoded,
            target: self.placement_target(&run.disc, dest_dir, name),
        })
    }

    async fn create_staging(&self, name: &str) -> Result<PathBuf, DomainError> {
        self.ports
            .fs
            .create_unique_directory(&self.config.paths.raw_path.join(format!("{}.transcode", name)))
            .await
    }

    fn placement_target(&self, disc: &DiscDescriptor, dest_dir: PathBuf, name: &str) -> PlacementTarget {
        PlacementTarget {
            category: disc.placement_category(),
            dest_dir,
            main_file_name: format!("{}.{}", name, self.config.rip.dest_ext),
            extras_dir: self.config.rip.extras_dir().map(str::to_string),
        }
    }

    /// Transcode every raw title; a failed title is recorded and the loop moves on.
    /// Returns the transcoded set and the number of failed titles.
    async fn transcode_titles(
        &self,
        run: &mut Run,
        raw_files: &OutputFileSet,
        staging: &Path,
    ) -> Result<(OutputFileSet, usize), DomainError> {
        let total = raw_files.len();
        let mut failed = 0;
        for file in &raw_files.files {
            let stem = Path::new(&file.name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file.name.clone());
            let request = TranscodeRequest {
                input: raw_files.path_of(file).to_string_lossy().to_string(),
                output: staging.join(format!("{}.{}", stem, self.config.rip.dest_ext)),
                disc_type: run.disc.disc_type(),
                main_feature: false,
                log_file: Some(run.log_file.clone()),
            };
            match self.ports.transcoder.transcode(&request).await {
                Ok(_) => {}
                Err(e) if e.is_run_fatal() => return Err(e),
                Err(e) => {
                    let failure = DomainError::TitleTranscode {
                        title: file.name.clone(),
                        reason: e.to_string(),
                    };
                    tracing::error!(error = %failure, "Title failed; continuing with remaining titles");
                    run.disc.record_error(file.name.clone());
                    failed += 1;
                }
            }
        }

        self.notify_transcoded(&run.disc, total - failed, total).await;
        Ok((self.ports.fs.list_files(staging).await?, failed))
    }

    async fn notify_transcoded(&self, disc: &DiscDescriptor, succeeded: usize, total: usize) {
        tracing::info!(total, failed = total - succeeded, "Transcoding finished");
        if self.config.notify.notify_transcode {
            self.notify(&format!(
                "{} transcoding finished, {} of {} titles succeeded.",
                disc.display_name(),
                succeeded,
                total
            ))
            .await;
        }
    }

    async fn rip_music(&self, run: &mut Run) -> Result<Staged, DomainError> {
        let music_dir = self.config.paths.music_dir.clone();
        let created = self.ports.fs.create_directory(&music_dir).await;
        let result = match &created {
            Ok(()) => {
                self.ports
                    .audio
                    .extract(run.disc.device_path(), &music_dir, Some(run.log_file.as_path()))
                    .await
            }
            Err(e) => Err(e.clone()),
        };
        // Ejects on every path, including a music root that could not be created
        self.eject(run.disc.device_path()).await;
        created?;

        match result {
            Ok(()) => self.ports.library.rescan().await,
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => {
                tracing::info!(error = %e, "Music rip failed. See previous errors.");
                run.disc.record_error(run.disc.display_name().to_string());
            }
        }
        Ok(Staged::Direct {
            destination: music_dir,
        })
    }

    async fn rip_data(&self, run: &mut Run) -> Result<Staged, DomainError> {
        let dir = self
            .ports
            .fs
            .create_unique_directory(
                &self
                    .config
                    .paths
                    .data_dir
                    .join(sanitize_path_component(run.disc.label_or_placeholder())),
            )
            .await;
        let result = match &dir {
            Ok(dir) => {
                let image = dir.join(data_image_name(run.disc.label()));
                self.ports
                    .byte_copy
                    .copy(run.disc.device_path(), &image, Some(run.log_file.as_path()))
                    .await
            }
            Err(e) => Err(e.clone()),
        };
        self.eject(run.disc.device_path()).await;
        let dir = dir?;

        match result {
            Ok(()) => {}
            Err(e) if e.is_run_fatal() => return Err(e),
            Err(e) => {
                tracing::info!(error = %e, "Data rip failed. See previous errors.");
                run.disc.record_error(run.disc.label_or_placeholder().to_string());
            }
        }
        Ok(Staged::Direct { destination: dir })
    }

    async fn finish_fatal(&self, mut run: Run, error: DomainError) -> RunOutcome {
        tracing::error!(error = %error, "Run aborted");
        run.enter(RunState::Finalized);
        self.notify(&format!(
            "{} processing failed: {}",
            run.disc.display_name(),
            error
        ))
        .await;
        run.into_outcome(Some(error))
    }

    async fn apply_permissions(&self, destination: Option<&Path>) {
        let Some(destination) = destination else {
            return;
        };
        if !self.config.permissions.enabled {
            return;
        }
        match self.config.permissions.mode() {
            Ok(mode) => {
                self.placement.normalize_permissions(destination, mode).await;
            }
            Err(e) => tracing::warn!(error = %e, "Skipping permission update"),
        }
    }

    async fn eject(&self, device_path: &str) {
        if let Err(e) = self.ports.drive.eject(device_path).await {
            tracing::warn!(device = device_path, error = %e, "Eject failed");
        }
    }

    async fn notify(&self, body: &str) {
        self.ports.notifier.notify(NOTIFY_TITLE, body).await;
    }

    async fn notify_start(&self, disc: &DiscDescriptor) {
        let body = match disc.disc_type() {
            DiscType::Dvd | DiscType::Bluray => format!(
                "Found disc: {}. Video type is {}. Main Feature is {}.",
                disc.display_name(),
                disc.placement_category(),
                self.config.rip.main_feature
            ),
            DiscType::Music => format!("Found music CD: {}. Ripping all tracks.", disc.display_name()),
            DiscType::Data => "Found data disc. Copying data.".to_string(),
            DiscType::Unknown => return,
        };
        self.notify(&body).await;
    }

    async fn notify_completion(&self, disc: &DiscDescriptor) {
        let body = if disc.errors().is_empty() {
            format!("{} processing complete.", disc.display_name())
        } else {
            let failed = disc.errors().join(", ");
            tracing::info!(failed = %failed, "Processing completed with errors");
            format!(
                "{} processing completed with errors. Title(s) {} failed to complete.",
                disc.display_name(),
                failed
            )
        };
        self.notify(&body).await;
    }
}

fn log_descriptor(disc: &DiscDescriptor) {
    tracing::info!(
        device = disc.device_path(),
        disc_type = %disc.disc_type(),
        label = disc.label(),
        video_title = disc.video_title(),
        video_year = disc.video_year(),
        video_category = %disc.video_category(),
        has_resolved_title = disc.has_resolved_title(),
        "Starting disc run"
    );
}
