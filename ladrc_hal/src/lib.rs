//! # LADRC HAL Library
//!
//! Plant adapters for the LADRC control unit. Every plant implements
//! `ladrc_common::plant::PlantAdapter` and is built by name through a
//! [`PlantRegistry`].
//!
//! # Module Structure
//!
//! - [`drivers`] - Plant adapter implementations
//! - [`plant_registry`] - Name → factory registration
//!
//! ```text
//!   CycleRunner ──u──► PlantAdapter::advance(u, dt) ──y──► CycleRunner
//!                         │
//!                         └─ clamp(u) to ActuatorLimits
//! ```

#![deny(missing_docs)]

pub mod drivers;
pub mod plant_registry;

pub use crate::drivers::simulation::MassDamperPlant;
pub use crate::plant_registry::PlantRegistry;
