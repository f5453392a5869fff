//! Non-finite state diagnostics.
//!
//! The arithmetic never checks for NaN/Inf. Instead the controller scans
//! its states once per tick and latches the first tick on which anything
//! became non-finite.

use bitflags::bitflags;
use ladrc_common::control::ControlOutput;

use crate::control::leso::LesoState;
use crate::control::td::TdState;

bitflags! {
    /// One flag per controller state or output that is NaN or infinite.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NonFiniteState: u8 {
        /// TD smoothed reference.
        const V1 = 0x01;
        /// TD reference rate.
        const V2 = 0x02;
        /// Observer output estimate.
        const X1 = 0x04;
        /// Observer rate estimate.
        const X2 = 0x08;
        /// Observer disturbance estimate.
        const X3 = 0x10;
        /// PD output before cancellation.
        const U0 = 0x20;
        /// Final command.
        const U  = 0x40;
    }
}

impl Default for NonFiniteState {
    fn default() -> Self {
        Self::empty()
    }
}

impl NonFiniteState {
    /// Flags for every non-finite value in one tick's states.
    pub fn scan(td: &TdState, leso: &LesoState, output: &ControlOutput) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::V1, !td.v1().is_finite());
        flags.set(Self::V2, !td.v2().is_finite());
        flags.set(Self::X1, !leso.x1().is_finite());
        flags.set(Self::X2, !leso.x2().is_finite());
        flags.set(Self::X3, !leso.x3().is_finite());
        flags.set(Self::U0, !output.u0.is_finite());
        flags.set(Self::U, !output.u.is_finite());
        flags
    }
}

/// First occurrence of a non-finite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonFiniteEvent {
    /// Zero-based tick on which the states were first non-finite.
    pub tick: u64,
    /// Which states were non-finite on that tick.
    pub states: NonFiniteState,
}

/// Latches the first [`NonFiniteEvent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NonFiniteMonitor {
    first: Option<NonFiniteEvent>,
}

impl NonFiniteMonitor {
    /// Record one tick's scan. Returns the event if this call latched it.
    #[inline]
    pub fn observe(&mut self, tick: u64, states: NonFiniteState) -> Option<NonFiniteEvent> {
        if states.is_empty() || self.first.is_some() {
            return None;
        }
        let event = NonFiniteEvent { tick, states };
        self.first = Some(event);
        Some(event)
    }

    /// The latched event, if any.
    #[inline]
    pub fn first(&self) -> Option<NonFiniteEvent> {
        self.first
    }

    /// Clear the latch.
    #[inline]
    pub fn reset(&mut self) {
        self.first = None;
    }
}
