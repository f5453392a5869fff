//! LADRC Common Library
//!
//! Shared parameter types, configuration loading and the plant-adapter
//! contract for all LADRC workspace crates.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading traits, `ConfigError`, log level
//! - [`consts`] - Reference-scenario defaults
//! - [`control`] - Controller parameters, control output, telemetry sample
//! - [`plant`] - `PlantAdapter` trait, plant parameters and actuator clamp
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use ladrc_common::prelude::*;
//!
//! let params = AdrcParameters::default();
//! assert!(params.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod control;
pub mod plant;
pub mod prelude;
