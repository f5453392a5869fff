//! Mass-damper physics simulator.
//!
//! A point mass with viscous damping, an optional constant external force
//! and a saturating actuator:
//!
//! ```text
//! u_applied = clamp(u, ±limit)
//! a[k]      = (u_applied + f_ext - c·v[k]) / m
//! v[k+1]    = v[k] + a[k]·dt
//! x[k+1]    = x[k] + v[k+1]·dt
//! ```
//!
//! With `c = 0` and `f_ext = 0` the model is a pure double integrator with
//! input gain `1/m`.

use ladrc_common::plant::{ActuatorLimits, PlantAdapter, PlantConfig};
use tracing::trace;

/// Mass-damper plant simulator.
#[derive(Debug, Clone)]
pub struct MassDamperPlant {
    /// Position (the measured output).
    position: f64,
    /// Velocity.
    velocity: f64,
    /// Mass [kg].
    mass: f64,
    /// Viscous damping [N·s/m].
    damping: f64,
    /// Constant external force [N].
    external_force: f64,
    /// Actuator saturation.
    limits: ActuatorLimits,
    /// Command applied during the last step.
    applied: f64,
}

impl MassDamperPlant {
    /// Create a plant at rest at the origin.
    ///
    /// `config` is expected to have passed `PlantConfig::validate()`.
    pub fn new(config: &PlantConfig) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            mass: config.mass,
            damping: config.damping,
            external_force: config.external_force,
            limits: config.limits(),
            applied: 0.0,
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Replace the external force (step disturbance injection).
    pub fn set_external_force(&mut self, force: f64) {
        self.external_force = force;
    }
}

impl PlantAdapter for MassDamperPlant {
    fn name(&self) -> &'static str {
        super::MASS_DAMPER_MODEL
    }

    fn advance(&mut self, command: f64, dt: f64) -> f64 {
        self.applied = self.limits.clamp(command);

        let acceleration =
            (self.applied + self.external_force - self.damping * self.velocity) / self.mass;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        trace!(
            command,
            applied = self.applied,
            position = self.position,
            velocity = self.velocity,
            "plant step"
        );

        self.position
    }

    fn applied_command(&self) -> Option<f64> {
        Some(self.applied)
    }
}
