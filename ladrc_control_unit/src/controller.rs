//! Single-channel ADRC controller.
//!
//! [`AdrcController`] owns validated parameters, the control state and the
//! non-finite monitor. It is the only way the binary and the loop driver
//! touch the control engine.

use ladrc_common::config::ConfigError;
use ladrc_common::control::{AdrcParameters, ControlOutput};
use tracing::{info, warn};

use crate::control::leso::LesoState;
use crate::control::output::{
    AdrcControlState, ControlInput, commit_applied, compute_control_output,
};
use crate::control::td::TdState;
use crate::diagnostics::{NonFiniteEvent, NonFiniteMonitor, NonFiniteState};

/// One ADRC channel.
#[derive(Debug, Clone)]
pub struct AdrcController {
    params: AdrcParameters,
    state: AdrcControlState,
    tick: u64,
    monitor: NonFiniteMonitor,
}

impl AdrcController {
    /// Build a controller at rest.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `params` fails
    /// [`AdrcParameters::validate`].
    pub fn new(params: AdrcParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            state: AdrcControlState::default(),
            tick: 0,
            monitor: NonFiniteMonitor::default(),
        })
    }

    /// Run one control tick and return the command.
    ///
    /// The command is unsaturated. Report what the actuator actually applied
    /// through [`commit_applied`](Self::commit_applied) before the next call.
    pub fn step(&mut self, target: f64, feedback: f64) -> ControlOutput {
        let output = compute_control_output(
            &mut self.state,
            &self.params,
            &ControlInput { target, feedback },
        );

        let flags = NonFiniteState::scan(&self.state.td, &self.state.leso, &output);
        if let Some(event) = self.monitor.observe(self.tick, flags) {
            warn!(
                tick = event.tick,
                states = ?event.states,
                "Controller state became non-finite"
            );
        }

        self.tick += 1;
        output
    }

    /// Replace the previous command with the saturated one.
    #[inline]
    pub fn commit_applied(&mut self, applied: f64) {
        commit_applied(&mut self.state, applied);
    }

    /// Swap in new parameters, keeping TD and observer state.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ValidationError` if `params` is invalid.
    /// - `ConfigError::ReloadScopeViolation` if `h` or `feedback` changed.
    ///
    /// On error the active parameters are unchanged.
    pub fn update_params(&mut self, params: AdrcParameters) -> Result<(), ConfigError> {
        params.validate()?;
        validate_reload_scope(&self.params, &params)?;

        info!(
            tick = self.tick,
            wc = params.wc,
            b0 = params.b0,
            w0 = params.w0,
            r = params.r,
            td_variant = ?params.td_variant,
            "Controller parameters reloaded"
        );
        self.params = params;
        Ok(())
    }

    /// Return to the state at construction. Parameters are kept.
    pub fn reset(&mut self) {
        self.state.reset();
        self.tick = 0;
        self.monitor.reset();
    }

    /// Active parameters.
    #[inline]
    pub fn params(&self) -> &AdrcParameters {
        &self.params
    }

    /// TD state.
    #[inline]
    pub fn td(&self) -> &TdState {
        &self.state.td
    }

    /// Observer state.
    #[inline]
    pub fn leso(&self) -> &LesoState {
        &self.state.leso
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// First tick on which any state or output was non-finite.
    #[inline]
    pub fn first_non_finite(&self) -> Option<NonFiniteEvent> {
        self.monitor.first()
    }
}

/// Check that a reload only changes reloadable parameters.
///
/// **Reloadable**: `wc`, `b0`, `w0`, `r`, `td_variant`, `sign_at_zero`.
///
/// **Not reloadable**: `h` (the discretization of every stage) and
/// `feedback` (what the observer state means).
pub fn validate_reload_scope(
    active: &AdrcParameters,
    shadow: &AdrcParameters,
) -> Result<(), ConfigError> {
    if active.h != shadow.h {
        return Err(ConfigError::ReloadScopeViolation(format!(
            "step h changed: {} → {} (requires restart)",
            active.h, shadow.h,
        )));
    }
    if active.feedback != shadow.feedback {
        return Err(ConfigError::ReloadScopeViolation(format!(
            "feedback source changed: {:?} → {:?} (requires restart)",
            active.feedback, shadow.feedback,
        )));
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
