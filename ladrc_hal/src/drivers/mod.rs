//! Plant adapter implementations.
//!
//! - [`simulation`] - Software plant models for development and testing
//!
//! # Adding New Plants
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement `PlantAdapter` from `ladrc_common::plant`
//! 3. Register the factory in [`register_all_plants`]

pub mod simulation;

use crate::plant_registry::PlantRegistry;

/// Register all built-in plant models into `registry`.
pub fn register_all_plants(registry: &mut PlantRegistry) {
    registry.register(simulation::MASS_DAMPER_MODEL, simulation::create_plant);
}
