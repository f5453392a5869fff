//! Plant adapter contract.
//!
//! A plant is anything that accepts a control command and returns a
//! measurement one step later: real hardware behind a driver, or a
//! simulation. Actuator saturation belongs to the plant, never to the
//! control law, so the clamp lives here with its bounds taken from
//! configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, require};
use crate::consts::{
    DEFAULT_ACTUATOR_LIMIT, DEFAULT_PLANT_DAMPING, DEFAULT_PLANT_MASS, DEFAULT_PLANT_MODEL,
};

/// Interface between the loop driver and a controlled process.
///
/// # Lifecycle
///
/// 1. Built once per control session.
/// 2. `advance()` called exactly once per tick with the step `dt`.
/// 3. Dropped when the session ends.
pub trait PlantAdapter {
    /// Short identifier used in logs (e.g. "mass_damper").
    fn name(&self) -> &'static str;

    /// Apply `command` for `dt` seconds and return the new measurement.
    ///
    /// Implementations saturate `command` to their actuator limits before
    /// integrating.
    fn advance(&mut self, command: f64, dt: f64) -> f64;

    /// Command actually applied during the last `advance()`, after
    /// saturation. `None` when the actuator is unbounded.
    fn applied_command(&self) -> Option<f64> {
        None
    }
}

impl<P: PlantAdapter + ?Sized> PlantAdapter for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn advance(&mut self, command: f64, dt: f64) -> f64 {
        (**self).advance(command, dt)
    }

    fn applied_command(&self) -> Option<f64> {
        (**self).applied_command()
    }
}

/// Error types for plant construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlantError {
    /// No plant model registered under this name.
    #[error("Plant model not found: {0}")]
    ModelNotFound(String),

    /// Plant parameters failed validation.
    #[error("Invalid plant configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Factory building a plant from its configuration.
pub type PlantFactory = fn(&PlantConfig) -> Box<dyn PlantAdapter>;

/// Actuator saturation bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorLimits {
    /// Lowest command the actuator can produce.
    pub min: f64,
    /// Highest command the actuator can produce.
    pub max: f64,
}

impl ActuatorLimits {
    /// Symmetric limits `[-limit, +limit]`.
    pub fn symmetric(limit: f64) -> Self {
        Self {
            min: -limit,
            max: limit,
        }
    }

    /// Saturate `command` into `[min, max]`.
    ///
    /// NaN passes through unchanged so the loop diagnostics can see it.
    #[inline]
    pub fn clamp(&self, command: f64) -> f64 {
        if command > self.max {
            self.max
        } else if command < self.min {
            self.min
        } else {
            command
        }
    }
}

/// Plant parameters.
///
/// The numeric fields describe the reference mass-damper model:
///
/// ```text
/// m·ẍ + c·ẋ = clamp(u) + f_ext
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantConfig {
    /// Registered plant model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Mass [kg].
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Viscous damping [N·s/m].
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Symmetric actuator limit [N].
    #[serde(default = "default_actuator_limit")]
    pub actuator_limit: f64,
    /// Constant external force [N] (0 = none).
    #[serde(default)]
    pub external_force: f64,
}

fn default_model() -> String {
    DEFAULT_PLANT_MODEL.to_string()
}

fn default_mass() -> f64 {
    DEFAULT_PLANT_MASS
}

fn default_damping() -> f64 {
    DEFAULT_PLANT_DAMPING
}

fn default_actuator_limit() -> f64 {
    DEFAULT_ACTUATOR_LIMIT
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            mass: DEFAULT_PLANT_MASS,
            damping: DEFAULT_PLANT_DAMPING,
            actuator_limit: DEFAULT_ACTUATOR_LIMIT,
            external_force: 0.0,
        }
    }
}

impl PlantConfig {
    /// Validate plant parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "plant.model cannot be empty".to_string(),
            ));
        }
        require("plant.mass", self.mass, "> 0", |v| v > 0.0)?;
        require("plant.damping", self.damping, ">= 0", |v| v >= 0.0)?;
        require("plant.actuator_limit", self.actuator_limit, "> 0", |v| v > 0.0)?;
        require("plant.external_force", self.external_force, "finite", |_| true)?;
        Ok(())
    }

    /// Actuator bounds derived from `actuator_limit`.
    pub fn limits(&self) -> ActuatorLimits {
        ActuatorLimits::symmetric(self.actuator_limit)
    }
}
