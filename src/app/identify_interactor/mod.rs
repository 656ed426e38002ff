// Identify interactor - Classifies a disc and resolves its title

use std::sync::Arc;

use crate::app::title_resolver::TitleResolver;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor that builds the Disc Descriptor for a run
pub struct IdentifyInteractor {
    inspector: Arc<dyn DiscInspectorPort>,
    resolver: TitleResolver,
}

impl IdentifyInteractor {
    pub fn new(inspector: Arc<dyn DiscInspectorPort>, lookup: Arc<dyn MetadataLookupPort>) -> Self {
        Self {
            inspector,
            resolver: TitleResolver::new(lookup),
        }
    }

    /// Classify the disc in `device_path`; video discs also get a title lookup
    pub async fn identify(&self, device_path: &str) -> Result<DiscDescriptor, DomainError> {
        let identity = self.inspector.classify(device_path).await?;
        let mut disc = DiscDescriptor::classified(device_path, identity.disc_type, identity.label);

        if disc.disc_type().is_video() {
            let resolution = self.resolver.resolve(disc.label()).await;
            disc.apply_resolution(&resolution);
        }
        Ok(disc)
    }

    /// Like [`identify`](Self::identify), but a classification failure yields
    /// an `unknown` descriptor so the run can still finalize and report it
    pub async fn identify_or_unknown(&self, device_path: &str) -> DiscDescriptor {
        match self.identify(device_path).await {
            Ok(disc) => disc,
            Err(e) => {
                tracing::error!(device = device_path, error = %e, "Disc classification failed");
                DiscDescriptor::classified(device_path, DiscType::Unknown, "")
            }
        }
    }

    /// Run only the title resolver against a label
    pub async fn lookup(&self, label: &str) -> TitleResolution {
        self.resolver.resolve(label).await
    }
}
