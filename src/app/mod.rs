// Application layer - Use case interactors

pub mod container;
pub mod identify_interactor;
pub mod placement;
pub mod rip_interactor;
pub mod title_resolver;

// Re-export interactors
pub use identify_interactor::IdentifyInteractor;
pub use placement::{OutputPlacement, PlacementTarget};
pub use rip_interactor::{RipInteractor, RipPorts};
pub use title_resolver::TitleResolver;
