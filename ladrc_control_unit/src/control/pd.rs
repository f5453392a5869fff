//! PD law with disturbance cancellation.
//!
//! ```text
//! e1 = v1 - x1
//! e2 = 0  - x2          (rate reference held at zero: step regulation)
//! u0 = kp × e1 + kd × e2
//! u  = (u0 - x3) / b0
//! ```
//!
//! No saturation here; actuator limits belong to the plant adapter.

use ladrc_common::control::ControlOutput;

use super::leso::LesoState;
use super::td::TdState;

/// PD gains derived from the closed-loop bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdGains {
    /// Proportional gain.
    pub kp: f64,
    /// Derivative gain.
    pub kd: f64,
}

impl PdGains {
    /// `kp = wc²`, `kd = 2·wc` (both closed-loop poles at `-wc`).
    #[inline]
    pub fn from_bandwidth(wc: f64) -> Self {
        Self {
            kp: wc * wc,
            kd: 2.0 * wc,
        }
    }
}

/// Compute the control command from the TD reference and the observer
/// estimates.
///
/// `b0` must be non-zero; `AdrcParameters::validate` guarantees it for
/// every controller built through `AdrcController`.
#[inline]
pub fn pd_compute(gains: &PdGains, b0: f64, td: &TdState, leso: &LesoState) -> ControlOutput {
    let e1 = td.v1() - leso.x1();
    let e2 = 0.0 - leso.x2();
    let u0 = gains.kp * e1 + gains.kd * e2;

    ControlOutput {
        u0,
        u: (u0 - leso.x3()) / b0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
