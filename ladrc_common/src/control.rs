//! Control types shared by the control unit and its callers.
//!
//! Defines [`AdrcParameters`] (the whole tunable surface of one controller
//! channel), [`ControlOutput`] and the read-only [`TelemetrySample`].

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::config::{ConfigError, require};
use crate::consts::{DEFAULT_B0, DEFAULT_STEP_S, DEFAULT_TD_SPEED, DEFAULT_W0, DEFAULT_WC};

/// Tracking differentiator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TdVariant {
    /// Critically damped second-order linear filter.
    Linear,
    /// Han's nonlinear synthesis function `fhan`.
    #[default]
    Fhan,
}

/// Value taken by `sign(0)` inside the fhan tracking differentiator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignAtZero {
    /// `sign(0) = +1`.
    #[default]
    Positive,
    /// `sign(0) = -1`.
    Negative,
    /// `sign(0) = 0`; the fhan law then has an exact fixed point at the target.
    Zero,
}

impl SignAtZero {
    /// Branch-based sign with this policy at zero.
    #[inline]
    pub fn sign(self, x: f64) -> f64 {
        if x > 0.0 {
            1.0
        } else if x < 0.0 {
            -1.0
        } else {
            match self {
                Self::Positive => 1.0,
                Self::Negative => -1.0,
                Self::Zero => 0.0,
            }
        }
    }
}

/// Signal fed into the observer each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    /// Measured plant output (closed loop).
    #[default]
    Measurement,
    /// The applied control command (self-sensing / open-loop model).
    ControlCommand,
}

/// Parameters of one ADRC channel.
///
/// Gains are never stored: `kp`, `kd`, `l1..l3` are derived from `wc` and
/// `w0` on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdrcParameters {
    // ─── PD law ─────────────────────────────────────
    /// Closed-loop bandwidth [rad/s] (`kp = wc²`, `kd = 2·wc`).
    #[serde(default = "default_wc")]
    pub wc: f64,
    /// Assumed control-input gain. Must be non-zero.
    #[serde(default = "default_b0")]
    pub b0: f64,

    // ─── Observer ───────────────────────────────────
    /// Observer bandwidth [rad/s].
    #[serde(default = "default_w0")]
    pub w0: f64,

    // ─── Tracking differentiator ────────────────────
    /// Tracking speed factor.
    #[serde(default = "default_r")]
    pub r: f64,
    /// TD variant.
    #[serde(default)]
    pub td_variant: TdVariant,
    /// `sign(0)` policy for the fhan variant.
    #[serde(default)]
    pub sign_at_zero: SignAtZero,

    // ─── Loop ───────────────────────────────────────
    /// Fixed integration step [s].
    #[serde(default = "default_h")]
    pub h: f64,
    /// Observer input selection.
    #[serde(default)]
    pub feedback: FeedbackSource,
}

fn default_wc() -> f64 {
    DEFAULT_WC
}

fn default_b0() -> f64 {
    DEFAULT_B0
}

fn default_w0() -> f64 {
    DEFAULT_W0
}

fn default_r() -> f64 {
    DEFAULT_TD_SPEED
}

fn default_h() -> f64 {
    DEFAULT_STEP_S
}

impl Default for AdrcParameters {
    fn default() -> Self {
        Self {
            wc: DEFAULT_WC,
            b0: DEFAULT_B0,
            w0: DEFAULT_W0,
            r: DEFAULT_TD_SPEED,
            td_variant: TdVariant::default(),
            sign_at_zero: SignAtZero::default(),
            h: DEFAULT_STEP_S,
            feedback: FeedbackSource::default(),
        }
    }
}

impl AdrcParameters {
    /// Validate the parameter set.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if any value is non-finite, or if
    /// `h <= 0`, `w0 <= 0`, `r <= 0`, `b0 == 0` or `wc < 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("h", self.h, "> 0", |v| v > 0.0)?;
        require("w0", self.w0, "> 0", |v| v > 0.0)?;
        require("r", self.r, "> 0", |v| v > 0.0)?;
        require("b0", self.b0, "non-zero", |v| v != 0.0)?;
        require("wc", self.wc, ">= 0", |v| v >= 0.0)?;
        Ok(())
    }
}

/// Output of the PD + disturbance-cancellation law, 2 × f64 = 16 bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct ControlOutput {
    /// Raw PD law output.
    pub u0: f64,
    /// Disturbance-compensated command `(u0 - x3) / b0`, unsaturated.
    pub u: f64,
}

const_assert_eq!(core::mem::size_of::<ControlOutput>(), 16);

impl ControlOutput {
    /// Returns true if both fields are finite (not NaN, not Inf).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.u0.is_finite() && self.u.is_finite()
    }
}

/// One tick of read-only telemetry.
///
/// Exported for logging and plotting; never re-injected into the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Tick index, starting at 0.
    pub tick: u64,
    /// Setpoint used this tick.
    pub target: f64,
    /// Observer input used this tick.
    pub feedback: f64,
    /// Smoothed reference.
    pub v1: f64,
    /// Smoothed reference rate.
    pub v2: f64,
    /// Estimated output.
    pub x1: f64,
    /// Estimated output rate.
    pub x2: f64,
    /// Estimated total disturbance.
    pub x3: f64,
    /// Raw PD law output.
    pub u0: f64,
    /// Compensated command.
    pub u: f64,
    /// Command after actuator saturation.
    pub applied: f64,
    /// Plant output after this tick.
    pub output: f64,
}
