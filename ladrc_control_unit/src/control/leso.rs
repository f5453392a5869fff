//! Linear Extended State Observer (LESO).
//!
//! Models the plant as a double integrator plus an unknown "total
//! disturbance" entering at the acceleration level, and estimates all three
//! states from the measured output and the previously applied command.
//!
//! Algorithm (explicit Euler, all right-hand sides use the pre-update
//! states):
//! ```text
//! err = x1 - y
//! x1 += (x2 - l1 × err) × h
//! x2 += (x3 - l2 × err + b0 × u_prev) × h
//! x3 += -l3 × err × h
//! ```
//!
//! Gains place all three observer poles at `-w0`:
//! `s³ + l1·s² + l2·s + l3 = (s + w0)³`.

/// Observer gains derived from the observer bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverGains {
    /// Output-error gain.
    pub l1: f64,
    /// Rate-error gain.
    pub l2: f64,
    /// Disturbance-error gain.
    pub l3: f64,
}

impl ObserverGains {
    /// `l1 = 3·w0`, `l2 = 3·w0²`, `l3 = w0³`.
    #[inline]
    pub fn from_bandwidth(w0: f64) -> Self {
        Self {
            l1: 3.0 * w0,
            l2: 3.0 * w0 * w0,
            l3: w0 * w0 * w0,
        }
    }
}

/// Internal state of the observer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LesoState {
    /// Estimated plant output.
    x1: f64,
    /// Estimated output rate.
    x2: f64,
    /// Estimated total disturbance.
    x3: f64,
}

impl LesoState {
    /// Estimated plant output.
    #[inline]
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// Estimated output rate.
    #[inline]
    pub fn x2(&self) -> f64 {
        self.x2
    }

    /// Estimated total disturbance.
    #[inline]
    pub fn x3(&self) -> f64 {
        self.x3
    }

    /// Reset all internal state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Compute one observer step.
///
/// # Arguments
/// - `state`: Mutable observer state.
/// - `gains`: Gains for this tick (see [`ObserverGains::from_bandwidth`]).
/// - `b0`: Assumed control-input gain.
/// - `u_prev`: Command applied to the plant on the previous tick.
/// - `measurement`: Observer input for this tick.
/// - `h`: Fixed step [s].
///
/// # Returns
/// `(x1, x2, x3)` after the update.
#[inline]
pub fn leso_compute(
    state: &mut LesoState,
    gains: &ObserverGains,
    b0: f64,
    u_prev: f64,
    measurement: f64,
    h: f64,
) -> (f64, f64, f64) {
    let err = state.x1 - measurement;

    let x1 = state.x1 + (state.x2 - gains.l1 * err) * h;
    let x2 = state.x2 + (state.x3 - gains.l2 * err + b0 * u_prev) * h;
    let x3 = state.x3 - gains.l3 * err * h;

    state.x1 = x1;
    state.x2 = x2;
    state.x3 = x3;

    (x1, x2, x3)
}

// ─── Tests ──────────────────────────────────────────────────────────
