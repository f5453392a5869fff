//! One control tick: TD → LESO → PD.
//!
//! Also defines [`AdrcControlState`], which holds every piece of per-channel
//! controller state (TD, observer, last applied command).

use ladrc_common::control::{AdrcParameters, ControlOutput};

use super::leso::{LesoState, ObserverGains, leso_compute};
use super::pd::{PdGains, pd_compute};
use super::td::{TdParams, TdState, td_compute};

// ─── AdrcControlState ───────────────────────────────────────────────

/// Per-channel control engine state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdrcControlState {
    /// Tracking differentiator state.
    pub td: TdState,
    /// Observer state.
    pub leso: LesoState,
    /// Command fed to the observer's input term on the next tick.
    ///
    /// Holds the unsaturated `u` after [`compute_control_output`]; replaced
    /// by the saturated value through [`commit_applied`].
    pub prev_command: f64,
}

impl AdrcControlState {
    /// Reset all internal controller state to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.td.reset();
        self.leso.reset();
        self.prev_command = 0.0;
    }
}

// ─── Control Output Computation ─────────────────────────────────────

/// Input data for one tick.
#[derive(Debug, Clone, Copy)]
pub struct ControlInput {
    /// Setpoint.
    pub target: f64,
    /// Observer input: measured output or applied command.
    pub feedback: f64,
}

/// Compute the control output for one tick.
///
/// Pipeline:
/// 1. TD: shape `target` into `v1`, `v2`
/// 2. LESO: update `x1..x3` from `feedback` and the previous command
/// 3. PD: `u0 = kp·(v1 - x1) - kd·x2`, `u = (u0 - x3) / b0`
///
/// Gains are derived from `params` on every call so a parameter update
/// takes effect on the next tick.
pub fn compute_control_output(
    state: &mut AdrcControlState,
    params: &AdrcParameters,
    input: &ControlInput,
) -> ControlOutput {
    let h = params.h;

    // ── 1. TD ───────────────────────────────────────────────
    td_compute(&mut state.td, &TdParams::from(params), input.target, h);

    // ── 2. LESO ─────────────────────────────────────────────
    let observer_gains = ObserverGains::from_bandwidth(params.w0);
    leso_compute(
        &mut state.leso,
        &observer_gains,
        params.b0,
        state.prev_command,
        input.feedback,
        h,
    );

    // ── 3. PD + cancellation ────────────────────────────────
    let output = pd_compute(
        &PdGains::from_bandwidth(params.wc),
        params.b0,
        &state.td,
        &state.leso,
    );

    state.prev_command = output.u;

    output
}

/// Record the command actually applied to the plant this tick.
///
/// Call after the actuator saturated the command; the observer then sees
/// the real plant input on the next tick.
#[inline]
pub fn commit_applied(state: &mut AdrcControlState, applied: f64) {
    state.prev_command = applied;
}

// ─── Tests ──────────────────────────────────────────────────────────
