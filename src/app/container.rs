use std::sync::Arc;

use crate::adapters::{
    AbcdeAdapter, DdCopyAdapter, DriveAdapter, EmbyRescanAdapter, HandBrakeAdapter,
    LocalFsAdapter, MakeMkvAdapter, OmdbClient, ProcessAdapter, PushNotifier,
    UdevInspectorAdapter,
};
use crate::app::{
    identify_interactor::IdentifyInteractor,
    rip_interactor::{RipInteractor, RipPorts},
};
use crate::config::RipConfig;
use crate::domain::errors::DomainError;
use crate::ports::{
    AudioExtractorPort, ByteCopyPort, DiscInspectorPort, DrivePort, FsPort, LibraryRescanPort,
    MetadataLookupPort, NotifyPort, ProcessPort, RipperPort, TranscoderPort,
};

pub trait AppContainer: Send + Sync {
    fn identify_interactor(&self) -> Arc<IdentifyInteractor>;
    fn rip_interactor(&self) -> Arc<RipInteractor>;
    fn drive(&self) -> Arc<dyn DrivePort>;
}

pub struct DefaultAppContainer {
    identify_interactor: Arc<IdentifyInteractor>,
    rip_interactor: Arc<RipInteractor>,
    drive: Arc<dyn DrivePort>,
}

impl DefaultAppContainer {
    pub fn new(config: Arc<RipConfig>) -> Result<Self, DomainError> {
        let process_port: Arc<dyn ProcessPort> = Arc::new(ProcessAdapter::new());
        let fs_port: Arc<dyn FsPort> = Arc::new(LocalFsAdapter::new());
        let tools = &config.tools;

        let inspector = Arc::new(UdevInspectorAdapter::new(
            &tools.udevadm,
            Arc::clone(&process_port),
        ));
        let lookup = Arc::new(OmdbClient::new(&config.metadata)?);
        let drive: Arc<dyn DrivePort> =
            Arc::new(DriveAdapter::new(&tools.eject, Arc::clone(&process_port)));

        let ports = RipPorts {
            drive: Arc::clone(&drive),
            ripper: Arc::new(MakeMkvAdapter::new(
                &tools.makemkvcon,
                config.rip.clone(),
                Arc::clone(&process_port),
                Arc::clone(&fs_port),
            )) as Arc<dyn RipperPort>,
            transcoder: Arc::new(HandBrakeAdapter::new(
                &tools.handbrake_cli,
                config.transcode.clone(),
                Arc::clone(&process_port),
            )) as Arc<dyn TranscoderPort>,
            audio: Arc::new(AbcdeAdapter::new(&tools.abcde, Arc::clone(&process_port)))
                as Arc<dyn AudioExtractorPort>,
            byte_copy: Arc::new(DdCopyAdapter::new(&tools.dd, Arc::clone(&process_port)))
                as Arc<dyn ByteCopyPort>,
            notifier: Arc::new(PushNotifier::new(&config.notify)?) as Arc<dyn NotifyPort>,
            library: Arc::new(EmbyRescanAdapter::new(config.library.clone())?)
                as Arc<dyn LibraryRescanPort>,
            fs: Arc::clone(&fs_port),
        };

        let identify_interactor = Arc::new(IdentifyInteractor::new(
            inspector as Arc<dyn DiscInspectorPort>,
            lookup as Arc<dyn MetadataLookupPort>,
        ));
        let rip_interactor = Arc::new(RipInteractor::new(ports, config));

        Ok(Self {
            identify_interactor,
            rip_interactor,
            drive,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn identify_interactor(&self) -> Arc<IdentifyInteractor> {
        Arc::clone(&self.identify_interactor)
    }

    fn rip_interactor(&self) -> Arc<RipInteractor> {
        Arc::clone(&self.rip_interactor)
    }

    fn drive(&self) -> Arc<dyn DrivePort> {
        Arc::clone(&self.drive)
    }
}
