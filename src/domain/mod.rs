// Domain layer - Disc model, run taxonomy and pure selection rules

pub mod errors;
pub mod model;
pub mod rules;
