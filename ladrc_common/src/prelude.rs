//! Prelude module for common re-exports.
//!
//! ```rust
//! use ladrc_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Control ────────────────────────────────────────────────────────
pub use crate::control::{
    AdrcParameters, ControlOutput, FeedbackSource, SignAtZero, TdVariant, TelemetrySample,
};

// ─── Plant ──────────────────────────────────────────────────────────
pub use crate::plant::{ActuatorLimits, PlantAdapter, PlantConfig, PlantError, PlantFactory};
