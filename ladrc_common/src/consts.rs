//! Reference-scenario defaults.
//!
//! A unit-mass plant with light damping, driven to a 400-unit step at 200 Hz.

/// Default closed-loop (controller) bandwidth [rad/s].
pub const DEFAULT_WC: f64 = 30.0;

/// Default assumed control-input gain.
pub const DEFAULT_B0: f64 = 1.0;

/// Default observer bandwidth [rad/s].
pub const DEFAULT_W0: f64 = 90.0;

/// Default fixed step [s].
pub const DEFAULT_STEP_S: f64 = 0.005;

/// Default tracking-differentiator speed factor.
pub const DEFAULT_TD_SPEED: f64 = 100.0;

/// Default registered plant model.
pub const DEFAULT_PLANT_MODEL: &str = "mass_damper";

/// Default plant mass [kg].
pub const DEFAULT_PLANT_MASS: f64 = 1.0;

/// Default plant viscous damping [N·s/m].
pub const DEFAULT_PLANT_DAMPING: f64 = 0.1;

/// Default symmetric actuator limit [N].
pub const DEFAULT_ACTUATOR_LIMIT: f64 = 1000.0;

/// Default step target.
pub const DEFAULT_TARGET: f64 = 400.0;

/// Default scenario length [ticks].
pub const DEFAULT_TICKS: u64 = 1000;

/// Default progress-log interval [ticks].
pub const DEFAULT_REPORT_INTERVAL: u64 = 100;
