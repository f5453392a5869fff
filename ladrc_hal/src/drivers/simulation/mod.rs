//! Simulation plant module.
//!
//! Software plant models used to exercise the control loop without
//! hardware.

mod physics;

pub use physics::MassDamperPlant;

use ladrc_common::plant::{PlantAdapter, PlantConfig};

/// Registry name of the mass-damper model.
pub const MASS_DAMPER_MODEL: &str = "mass_damper";

/// Factory function to create a mass-damper plant instance.
pub fn create_plant(config: &PlantConfig) -> Box<dyn PlantAdapter> {
    Box::new(MassDamperPlant::new(config))
}
