//! Tracking Differentiator (TD).
//!
//! Turns a (possibly stepped) setpoint into a smooth reference `v1` and its
//! rate `v2`. Both variants share the explicit Euler update at step `h`:
//!
//! ```text
//! v1 += v2 × h
//! v2 += fh × h
//! ```
//!
//! **Linear** (critically damped, poles at `-r`):
//! ```text
//! fh = -r² × (v1 - target) - 2r × v2
//! ```
//!
//! **Fhan** (nonlinear, near time-optimal approach to the target):
//! ```text
//! d  = r × h
//! y  = v1 - target + v2 × h
//! a0 = sqrt(d² + 8r × |y|)
//! a  = v2 + sign(y) × (a0 - d) / 2
//! fh = -r × (a / d) - r × sign(a)
//! ```

use ladrc_common::control::{AdrcParameters, SignAtZero, TdVariant};

/// Internal state of the tracking differentiator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TdState {
    /// Smoothed reference.
    v1: f64,
    /// Rate of the smoothed reference.
    v2: f64,
}

impl TdState {
    /// Smoothed reference.
    #[inline]
    pub fn v1(&self) -> f64 {
        self.v1
    }

    /// Rate of the smoothed reference.
    #[inline]
    pub fn v2(&self) -> f64 {
        self.v2
    }

    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// TD parameters, extracted from `AdrcParameters`.
#[derive(Debug, Clone, Copy)]
pub struct TdParams {
    /// Speed factor.
    pub r: f64,
    /// Variant.
    pub variant: TdVariant,
    /// `sign(0)` policy (Fhan only).
    pub sign_at_zero: SignAtZero,
}

impl From<&AdrcParameters> for TdParams {
    fn from(params: &AdrcParameters) -> Self {
        Self {
            r: params.r,
            variant: params.td_variant,
            sign_at_zero: params.sign_at_zero,
        }
    }
}

/// Han's synthesis function for tracking error `e = v1 - target`.
///
/// Requires `r > 0` and `h > 0`.
#[inline]
pub fn fhan(e: f64, v2: f64, r: f64, h: f64, sign_at_zero: SignAtZero) -> f64 {
    let d = r * h;
    let y = e + v2 * h;
    let a0 = (d * d + 8.0 * r * y.abs()).sqrt();
    let a = v2 + sign_at_zero.sign(y) * (a0 - d) / 2.0;
    -r * (a / d) - r * sign_at_zero.sign(a)
}

/// Run one TD step towards `target` and return `(v1, v2)`.
#[inline]
pub fn td_compute(state: &mut TdState, params: &TdParams, target: f64, h: f64) -> (f64, f64) {
    let e = state.v1 - target;
    let fh = match params.variant {
        TdVariant::Linear => -params.r * params.r * e - 2.0 * params.r * state.v2,
        TdVariant::Fhan => fhan(e, state.v2, params.r, h, params.sign_at_zero),
    };

    state.v1 += state.v2 * h;
    state.v2 += fh * h;

    (state.v1, state.v2)
}

// ─── Tests ──────────────────────────────────────────────────────────
